//! 数学ユーティリティ
//!
//! glamの型を再エクスポートし、アニメーション用の小さなヘルパーを追加

pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};

/// 1回転（ラジアン）
pub const TAU: f32 = std::f32::consts::TAU;

/// 線形補間
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// 許容誤差つき比較
#[inline]
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}
