//! ユーティリティモジュール
//!
//! ログ初期化、エラー変換など

use std::fmt::Display;

use wasm_bindgen::JsValue;

/// 設定文字列からログレベルを決める（不明なら Info）
pub fn parse_level(level: &str) -> log::Level {
    level.trim().parse().unwrap_or(log::Level::Info)
}

/// console_log を初期化（2回目以降は無視される）
pub fn init_logging(level: &str) {
    console_log::init_with_level(parse_level(level)).ok();
}

/// エラーをJS側へ渡す文字列に変換
pub fn to_js(error: impl Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}
