//! Tweenエンジン
//!
//! 数値プロパティ（位置・回転）を時間ベースで補間する。
//! 単体Tween、相対オフセット付きTimeline、遅延コールをサポート。

pub mod easing;
pub mod engine;
pub mod property;
pub mod timeline;
#[allow(clippy::module_inception)]
pub mod tween;

pub use easing::Easing;
pub use engine::{TimelineId, TweenEngine, TweenId};
pub use property::{Animatable, Axis, Property};
pub use timeline::{Position, Timeline};
pub use tween::{Channel, Tween};
