pub mod components;
pub mod math;
pub mod scene;
pub mod tween;

// Re-exports
pub use components::{Name, Transform};
pub use scene::{MeshRef, Node, NodeId, SceneGraph};
pub use tween::{
    Animatable, Axis, Channel, Easing, Position, Property, Timeline, TimelineId, Tween,
    TweenEngine, TweenId,
};
