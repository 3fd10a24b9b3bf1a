//! カルーセルの操作レイヤー
//!
//! 平面の集合、ホバー・ピック・ドラッグの状態遷移、カメラ・グループ・各平面を
//! 動かすTweenを持つ。描画・画像読み込み・DOMはブラウザ側のクレートが担い、
//! ここではカメラ、平面ごとのテクスチャ、経過時間だけを受け取る。

pub mod audio;
pub mod carousel;
pub mod choreography;
pub mod config;
pub mod drag;
pub mod error;
pub mod layout;
pub mod plane;
pub mod pointer;
pub mod rig;
pub mod state;

pub use audio::AudioCue;
pub use carousel::{Carousel, CarouselContext};
pub use config::CarouselConfig;
pub use drag::{DragState, Momentum};
pub use error::CarouselError;
pub use layout::{Arrangement, LayoutEntry, LayoutKind, LayoutPreset, LayoutRegistry};
pub use plane::Plane;
pub use pointer::{screen_to_ndc, Pointer};
pub use rig::{Pose, Rig, Snapshot, Target};
pub use state::{Cue, InteractionState, RotationDriver, Stage};
