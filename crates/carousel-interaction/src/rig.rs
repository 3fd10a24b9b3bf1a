//! カメラ・グループ・平面ノードの束
//!
//! Tweenエンジンの書き込み先（[`Animatable`]）になる。

use carousel_core::{Animatable, MeshRef, Name, NodeId, Property, SceneGraph, Transform};
use carousel_renderer::{Camera, TextureId};
use glam::{Mat4, Vec3};

use crate::plane::Plane;

/// Tweenの対象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Camera,
    Group,
    Plane(usize),
}

/// 位置と回転（Euler XYZ）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }
}

impl From<&Transform> for Pose {
    fn from(transform: &Transform) -> Self {
        Self::new(transform.position, transform.rotation)
    }
}

/// ピック直前の状態
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub camera: Pose,
    pub group_rotation: Vec3,
    pub planes: Vec<Pose>,
}

/// シーングラフとカメラ
pub struct Rig {
    scene: SceneGraph,
    camera: Camera,
    group: Option<NodeId>,
    planes: Vec<Plane>,
}

impl Rig {
    /// 平面なしのリグ
    pub fn new(camera: Camera) -> Self {
        Self {
            scene: SceneGraph::new(),
            camera,
            group: None,
            planes: Vec::new(),
        }
    }

    /// グループと平面を生成する（既存のものは先に破棄）
    pub fn populate(&mut self, poses: &[Pose], textures: &[TextureId], wave_amplitude: f32) {
        self.dismantle();

        let group = self.scene.spawn(Name::new("carousel"), Transform::identity());
        self.scene.add_root(group);

        self.planes = poses
            .iter()
            .zip(textures)
            .enumerate()
            .map(|(index, (pose, &texture))| {
                let node = self.scene.spawn(
                    Name::indexed("plane", index),
                    Transform::from_pose(pose.position, pose.rotation),
                );
                if let Some(node) = self.scene.get_mut(node) {
                    node.mesh = Some(MeshRef { plane: index });
                }
                self.scene.attach(node, group);
                Plane::new(index, node, texture, wave_amplitude)
            })
            .collect();
        self.group = Some(group);

        log::debug!("rig populated with {} plane(s)", self.planes.len());
    }

    /// グループごと全ノードを削除し、解放した平面のindexを返す
    /// 2回目以降は空
    pub fn dismantle(&mut self) -> Vec<usize> {
        let Some(group) = self.group.take() else {
            return Vec::new();
        };
        self.planes.clear();
        let mut released: Vec<usize> = self
            .scene
            .despawn(group)
            .into_iter()
            .filter_map(|node| node.mesh.map(|mesh| mesh.plane))
            .collect();
        released.sort_unstable();
        released
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    pub fn group_rotation(&self) -> Vec3 {
        self.group
            .and_then(|group| self.scene.transform(group))
            .map(|transform| transform.rotation)
            .unwrap_or(Vec3::ZERO)
    }

    /// グループをY軸まわりに回す
    pub fn add_group_yaw(&mut self, delta: f32) {
        if let Some(transform) = self.group.and_then(|group| self.scene.transform_mut(group)) {
            transform.rotation.y += delta;
        }
    }

    pub fn plane_transform(&self, index: usize) -> Option<&Transform> {
        let plane = self.planes.get(index)?;
        self.scene.transform(plane.node)
    }

    /// 平面のワールド行列（グループの回転込み）
    pub fn plane_world(&self, index: usize) -> Option<Mat4> {
        let plane = self.planes.get(index)?;
        self.scene.world_matrix(plane.node)
    }

    /// 全平面のワールド行列
    pub fn plane_worlds(&self) -> Vec<(usize, Mat4)> {
        self.planes
            .iter()
            .filter_map(|plane| {
                self.scene
                    .world_matrix(plane.node)
                    .map(|world| (plane.index, world))
            })
            .collect()
    }

    /// 現在の状態を保存
    pub fn capture(&self) -> Snapshot {
        Snapshot {
            camera: Pose::new(self.camera.position, self.camera.rotation),
            group_rotation: self.group_rotation(),
            planes: self
                .planes
                .iter()
                .map(|plane| self.scene.transform(plane.node).map(Pose::from).unwrap_or_default())
                .collect(),
        }
    }

    fn node(&self, target: Target) -> Option<NodeId> {
        match target {
            Target::Camera => None,
            Target::Group => self.group,
            Target::Plane(index) => self.planes.get(index).map(|plane| plane.node),
        }
    }
}

impl Animatable<Target> for Rig {
    fn read(&self, target: Target, property: Property) -> Option<f32> {
        match target {
            Target::Camera => Some(self.camera.transform().property(property)),
            _ => self
                .node(target)
                .and_then(|node| self.scene.transform(node))
                .map(|transform| transform.property(property)),
        }
    }

    fn write(&mut self, target: Target, property: Property, value: f32) {
        match target {
            Target::Camera => {
                let mut transform = self.camera.transform();
                transform.set_property(property, value);
                self.camera.position = transform.position;
                self.camera.rotation = transform.rotation;
            }
            _ => {
                if let Some(transform) = self
                    .node(target)
                    .and_then(|node| self.scene.transform_mut(node))
                {
                    transform.set_property(property, value);
                }
            }
        }
    }
}
