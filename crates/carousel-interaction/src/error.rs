//! エラー型

use std::fmt;

/// カルーセル構築時のエラー
///
/// 操作中は失敗しない（ピックなしの復帰などはログを出して何もしない）
#[derive(Debug)]
pub enum CarouselError {
    /// 平面の枚数よりテクスチャが少ない
    MissingTexture {
        /// テクスチャのない最初の平面
        index: usize,
        /// 要求された平面の枚数
        planes: usize,
    },
    /// 設定値が不正、または読み込めない
    Config(String),
    /// 登録されていない配置名
    UnknownLayout(String),
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTexture { index, planes } => {
                write!(f, "missing texture for plane {index} ({planes} planes requested)")
            }
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::UnknownLayout(name) => write!(f, "unknown layout: {name}"),
        }
    }
}

impl std::error::Error for CarouselError {}

impl From<serde_json::Error> for CarouselError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
