use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// テクスチャ識別子（読み込み済み画像のインデックス）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// 平面ごとのシェーダーパラメータ
/// カルーセルが書き込み、レンダラーが読み取る
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneUniforms {
    /// ドラッグ・慣性による回転量（波紋の向きと強さ）
    pub rotation_velocity: f32,
    /// 経過時間（秒）
    pub time: f32,
    /// 波紋の強さ（0..1）
    pub ripple_intensity: f32,
    /// 貼り付ける画像
    pub texture: TextureId,
    /// 常時揺れの振幅
    pub wave_amplitude: f32,
}

impl PlaneUniforms {
    pub fn new(texture: TextureId, wave_amplitude: f32) -> Self {
        Self {
            rotation_velocity: 0.0,
            time: 0.0,
            ripple_intensity: 0.0,
            texture,
            wave_amplitude,
        }
    }

    /// 波紋を減衰させる
    pub fn decay(&mut self, factor: f32) {
        self.rotation_velocity *= factor;
        self.ripple_intensity *= factor;
    }
}

/// GPU用の平面Uniform
/// WGSLの `struct PlaneUniform { model: mat4x4<f32>, params: vec4<f32> }` と一致させる
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PlaneUniform {
    pub model: [[f32; 4]; 4],
    /// x: time, y: rotation_velocity, z: ripple_intensity, w: wave_amplitude
    pub params: [f32; 4],
}

impl PlaneUniform {
    pub fn new(model: Mat4, uniforms: &PlaneUniforms) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            params: [
                uniforms.time,
                uniforms.rotation_velocity,
                uniforms.ripple_intensity,
                uniforms.wave_amplitude,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_uniform_size() {
        // mat4 (64) + vec4 (16)
        assert_eq!(std::mem::size_of::<PlaneUniform>(), 80);
    }

    #[test]
    fn test_params_layout() {
        let mut uniforms = PlaneUniforms::new(TextureId(3), 0.1);
        uniforms.time = 2.0;
        uniforms.rotation_velocity = 0.5;
        uniforms.ripple_intensity = 0.25;
        let gpu = PlaneUniform::new(Mat4::IDENTITY, &uniforms);
        assert_eq!(gpu.params, [2.0, 0.5, 0.25, 0.1]);
    }

    #[test]
    fn test_decay() {
        let mut uniforms = PlaneUniforms::new(TextureId(0), 0.1);
        uniforms.rotation_velocity = 1.0;
        uniforms.ripple_intensity = 0.5;
        uniforms.decay(0.5);
        assert_eq!(uniforms.rotation_velocity, 0.5);
        assert_eq!(uniforms.ripple_intensity, 0.25);
        assert_eq!(uniforms.wave_amplitude, 0.1);
    }
}
