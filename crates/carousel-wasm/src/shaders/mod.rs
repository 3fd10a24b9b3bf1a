//! シェーダーモジュール
//!
//! WGSLシェーダーを外部ファイルから読み込む

/// 平面シェーダー（波・波紋・画像）
pub const PLANE_SHADER: &str = include_str!("plane.wgsl");
