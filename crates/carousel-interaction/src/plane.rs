use carousel_core::NodeId;
use carousel_renderer::{PlaneUniforms, TextureId};

/// カルーセルの1枚
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub index: usize,
    /// シーングラフ上のノード
    pub node: NodeId,
    /// シェーダーパラメータ（カルーセルのみが書き込む）
    pub uniforms: PlaneUniforms,
}

impl Plane {
    pub fn new(index: usize, node: NodeId, texture: TextureId, wave_amplitude: f32) -> Self {
        Self {
            index,
            node,
            uniforms: PlaneUniforms::new(texture, wave_amplitude),
        }
    }
}
