//! シーングラフ
//!
//! 階層構造を持つノード（グループ・平面）とそのTransformを管理

pub mod graph;
pub mod node;

pub use graph::SceneGraph;
pub use node::{MeshRef, Node, NodeId};
