use bytemuck::{Pod, Zeroable};
use carousel_core::Transform;
use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::picking::Ray;

/// GPU用カメラUniform
/// View-Projection行列を列優先形式で格納
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Mat4からCameraUniformを作成
    pub fn from_mat4(mat: Mat4) -> Self {
        Self {
            view_proj: mat.to_cols_array_2d(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::from_mat4(Mat4::IDENTITY)
    }
}

/// 透視投影カメラ
/// 位置とEuler回転（XYZ順）を持ち、-Z方向を向く
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// デフォルト値で新しいカメラを作成
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            rotation: Vec3::ZERO,
            fov: 35.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// カメラのワールドTransform
    pub fn transform(&self) -> Transform {
        Transform::from_pose(self.position, self.rotation)
    }

    /// View行列（ワールド行列の逆行列）
    pub fn view_matrix(&self) -> Mat4 {
        self.transform().to_matrix().inverse()
    }

    /// Projection行列
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// View-Projection行列を構築
    pub fn build_view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// GPU用のCameraUniformを取得
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::from_mat4(self.build_view_projection_matrix())
    }

    /// 視線方向
    pub fn forward(&self) -> Vec3 {
        self.transform().quat() * Vec3::NEG_Z
    }

    /// カメラ位置を設定
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// カメラ回転を設定
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    /// アスペクト比を設定
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// targetを向くように回転を設定
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() < 1e-10 {
            return;
        }
        let world = Mat4::look_at_rh(self.position, target, Vec3::Y).inverse();
        let (_, rotation, _) = world.to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// 正規化デバイス座標（-1..1）からワールド空間のレイを生成
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.build_view_projection_matrix().inverse();
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }

    /// ワールド座標を正規化デバイス座標へ投影
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.build_view_projection_matrix().project_point3(world)
    }
}
