//! カルーセルの演出（Tween・Timelineの組み立て）
//!
//! ここでは値を計算して Tween を組み立てるだけで、エンジンへの登録と状態遷移は
//! [`Carousel`](crate::Carousel) が行う。

use carousel_core::math::TAU;
use carousel_core::{Axis, Easing, Position, Property, Timeline, Tween};
use glam::Vec3;

use crate::config::{AmbientConfig, PickConfig};
use crate::layout::LayoutPreset;
use crate::rig::{Pose, Snapshot, Target};
use crate::state::Cue;

const ROT_X: Property = Property::Rotation(Axis::X);
const ROT_Y: Property = Property::Rotation(Axis::Y);
const ROT_Z: Property = Property::Rotation(Axis::Z);
const POS_Y: Property = Property::Position(Axis::Y);

/// ピックした平面から数えて何枚先か（末尾から先頭へ回り込む）
pub fn forward_distance(index: usize, picked: usize, total: usize) -> usize {
    if index >= picked {
        index - picked
    } else {
        total - picked + index
    }
}

/// ピック時に他の平面が退避を始めるまでの遅延
pub fn exit_delay(index: usize, picked: usize, total: usize, stagger: f32) -> f32 {
    forward_distance(index, picked, total) as f32 * stagger
}

/// 最も近い1回転の倍数（巻き戻しを1周未満に抑える）
pub fn nearest_turn(angle: f32) -> f32 {
    (angle / TAU).round() * TAU
}

/// 登場スピン + 無限回転
///
/// カメラを配置の目標へ寄せ、平面を配置へ広げながらグループを1周させる。
/// 登場スピンの終わり際に重ねて無限回転を始める。回転は加算チャネルなので
/// ドラッグで動かした角度から続きを回す。
pub fn ambient_timeline(
    config: &AmbientConfig,
    preset: &LayoutPreset,
    poses: &[Pose],
) -> Timeline<Target, Cue> {
    let mut timeline = Timeline::new().add(
        Tween::new(Target::Camera, config.camera_duration)
            .position_to(preset.camera_position)
            .rotation_to(preset.camera_rotation)
            .ease(Easing::CubicOut),
        Position::At(0.0),
    );

    for (index, pose) in poses.iter().enumerate() {
        timeline = timeline.add(
            Tween::new(Target::Plane(index), config.spread_duration)
                .position_to(pose.position)
                .rotation_to(pose.rotation)
                .ease(Easing::QuadraticInOut),
            Position::WithPrevious,
        );
    }

    timeline
        .add(
            Tween::new(Target::Group, config.intro_spin_duration)
                .by(ROT_Y, TAU)
                .to(ROT_X, preset.group_rotation.x)
                .to(ROT_Z, preset.group_rotation.z)
                .ease(Easing::QuadraticOut)
                .on_complete(Cue::IntroComplete),
            Position::WithPrevious,
        )
        .add(
            Tween::new(Target::Group, config.spin_period)
                .by(ROT_Y, TAU)
                .ease(Easing::Linear)
                .repeat_forever(),
            Position::AfterPrevious(-config.seam_overlap),
        )
}

/// ピック演出
///
/// `group_yaw` はグループの戻り先（現在角に最も近い1回転の倍数）。
pub fn pick_tweens(
    config: &PickConfig,
    picked: usize,
    total: usize,
    group_yaw: f32,
) -> Vec<Tween<Target, Cue>> {
    let mut tweens = vec![
        Tween::new(Target::Plane(picked), config.plane_duration)
            .position_to(Vec3::ZERO)
            .rotation_to(Vec3::ZERO)
            .ease(Easing::CubicOut),
        Tween::new(Target::Group, config.plane_duration)
            .rotation_to(Vec3::new(0.0, group_yaw, 0.0))
            .ease(Easing::CubicOut),
        Tween::new(Target::Camera, config.camera_duration)
            .position_to(config.camera_position)
            .rotation_to(Vec3::ZERO)
            .ease(Easing::SineInOut)
            .on_complete(Cue::PickArrived),
    ];

    tweens.extend((0..total).filter(|&index| index != picked).map(|index| {
        Tween::new(Target::Plane(index), config.exit_duration)
            .to(POS_Y, config.exit_y)
            .delay(exit_delay(index, picked, total, config.stagger))
            .ease(Easing::QuadraticIn)
    }));
    tweens
}

/// 保存した状態へ戻す
pub fn restore_tweens(snapshot: &Snapshot, duration: f32) -> Vec<Tween<Target, Cue>> {
    let mut tweens = vec![
        Tween::new(Target::Camera, duration)
            .position_to(snapshot.camera.position)
            .rotation_to(snapshot.camera.rotation)
            .ease(Easing::QuadraticInOut)
            .on_complete(Cue::Restored),
        Tween::new(Target::Group, duration)
            .rotation_to(snapshot.group_rotation)
            .ease(Easing::QuadraticInOut),
    ];
    tweens.extend(snapshot.planes.iter().enumerate().map(|(index, pose)| {
        Tween::new(Target::Plane(index), duration)
            .position_to(pose.position)
            .rotation_to(pose.rotation)
            .ease(Easing::QuadraticInOut)
    }));
    tweens
}

/// 配置切り替え
pub fn layout_tweens(
    preset: &LayoutPreset,
    poses: &[Pose],
    duration: f32,
) -> Vec<Tween<Target, Cue>> {
    let mut tweens = vec![
        Tween::new(Target::Camera, duration)
            .position_to(preset.camera_position)
            .rotation_to(preset.camera_rotation)
            .ease(Easing::QuadraticInOut)
            .on_complete(Cue::LayoutSettled),
        Tween::new(Target::Group, duration)
            .rotation_to(preset.group_rotation)
            .ease(Easing::QuadraticInOut),
    ];
    tweens.extend(poses.iter().enumerate().map(|(index, pose)| {
        Tween::new(Target::Plane(index), duration)
            .position_to(pose.position)
            .rotation_to(pose.rotation)
            .ease(Easing::QuadraticInOut)
    }));
    tweens
}
