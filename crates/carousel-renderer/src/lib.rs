pub mod camera;
pub mod mesh;
pub mod picking;
pub mod uniform;

pub use camera::{Camera, CameraUniform};
pub use mesh::{Mesh, Vertex};
pub use picking::{pick_nearest, Hit, Ray};
pub use uniform::{PlaneUniform, PlaneUniforms, TextureId};

// Re-export glam types for consistent version usage
pub use glam;
