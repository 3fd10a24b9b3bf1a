use std::fmt;
use std::str::FromStr;

use carousel_core::math::TAU;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::CarouselError;
use crate::rig::Pose;

/// 平面の並べ方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Stack,
    Linear,
    Circular,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 3] = [LayoutKind::Stack, LayoutKind::Linear, LayoutKind::Circular];

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Stack => "stack",
            LayoutKind::Linear => "linear",
            LayoutKind::Circular => "circular",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = CarouselError;

    /// 大文字小文字を区別しない
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        LayoutKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CarouselError::UnknownLayout(name.to_string()))
    }
}

/// 配置ごとのカメラ・グループの目標値
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutPreset {
    pub camera_position: Vec3,
    pub camera_rotation: Vec3,
    pub group_rotation: Vec3,
}

impl Default for LayoutPreset {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(0.0, 0.0, 6.0),
            camera_rotation: Vec3::ZERO,
            group_rotation: Vec3::ZERO,
        }
    }
}

/// 平面の並べ方
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arrangement {
    /// 奥へ積み重ねる
    Stack { depth: f32 },
    /// 原点中心の縦一列
    Linear { spacing: f32 },
    /// Y軸まわりの円周上（rotation.y = -angle）
    Circular { radius: f32 },
}

impl Arrangement {
    /// count 枚分の配置を計算
    pub fn poses(self, count: usize) -> Vec<Pose> {
        (0..count).map(|index| self.pose(index, count)).collect()
    }

    /// index 番目の平面の配置
    pub fn pose(self, index: usize, count: usize) -> Pose {
        let i = index as f32;
        match self {
            Arrangement::Stack { depth } => Pose::new(Vec3::new(0.0, 0.0, -i * depth), Vec3::ZERO),
            Arrangement::Linear { spacing } => {
                let centre = count.saturating_sub(1) as f32 * 0.5;
                Pose::new(Vec3::new(0.0, (centre - i) * spacing, 0.0), Vec3::ZERO)
            }
            Arrangement::Circular { radius } => {
                let angle = i / count.max(1) as f32 * TAU;
                Pose::new(
                    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()),
                    Vec3::new(0.0, -angle, 0.0),
                )
            }
        }
    }
}

/// 登録済みの配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEntry {
    pub preset: LayoutPreset,
    pub arrangement: Arrangement,
}

/// 配置名 → カメラ目標・並べ方
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    entries: [(LayoutKind, LayoutEntry); 3],
}

impl LayoutRegistry {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            entries: [
                (
                    LayoutKind::Stack,
                    LayoutEntry {
                        preset: config.stack,
                        arrangement: Arrangement::Stack {
                            depth: config.stack_depth,
                        },
                    },
                ),
                (
                    LayoutKind::Linear,
                    LayoutEntry {
                        preset: config.linear,
                        arrangement: Arrangement::Linear {
                            spacing: config.linear_spacing,
                        },
                    },
                ),
                (
                    LayoutKind::Circular,
                    LayoutEntry {
                        preset: config.circular,
                        arrangement: Arrangement::Circular {
                            radius: config.circle_radius,
                        },
                    },
                ),
            ],
        }
    }

    /// 名前から検索（未登録ならNone）
    pub fn lookup(&self, name: &str) -> Option<LayoutKind> {
        name.parse().ok()
    }

    pub fn get(&self, kind: LayoutKind) -> &LayoutEntry {
        // entries は LayoutKind::ALL と同じ順に並んでいる
        let index = LayoutKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_default();
        &self.entries[index].1
    }

    pub fn preset(&self, kind: LayoutKind) -> LayoutPreset {
        self.get(kind).preset
    }

    /// count 枚分の配置を計算
    pub fn arrange(&self, kind: LayoutKind, count: usize) -> Vec<Pose> {
        self.get(kind).arrangement.poses(count)
    }

    pub fn kinds(&self) -> impl Iterator<Item = LayoutKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}
