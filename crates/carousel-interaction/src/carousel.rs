//! カルーセル本体
//!
//! ポインタ入力・ヒットテスト・Tween・シェーダーパラメータを1か所で調停する。
//! グループ回転の持ち主（[`RotationDriver`]）の切り替えは必ず [`Carousel::engage`]
//! を通し、アンビエントTimelineの一時停止・再開もそこで決まる。

use carousel_core::{Axis, Property, Timeline, TimelineId, Tween, TweenEngine, TweenId};
use carousel_renderer::{pick_nearest, Camera, Hit, TextureId};
use glam::{Vec2, Vec3};

use crate::audio::{self, AudioCue};
use crate::choreography;
use crate::config::CarouselConfig;
use crate::drag::{DragState, Momentum};
use crate::error::CarouselError;
use crate::layout::{LayoutKind, LayoutRegistry};
use crate::plane::Plane;
use crate::pointer::Pointer;
use crate::rig::{Rig, Snapshot, Target};
use crate::state::{Cue, InteractionState, RotationDriver, Stage};

const POS_Y: Property = Property::Position(Axis::Y);

/// 外部から渡す依存
pub struct CarouselContext {
    pub camera: Camera,
    /// 平面ごとのテクスチャ（平面の枚数以上必要）
    pub textures: Vec<TextureId>,
    pub audio: Option<Box<dyn AudioCue>>,
}

/// ピック中の平面と、ピック直前の状態
#[derive(Debug, Clone)]
struct Pick {
    index: usize,
    snapshot: Snapshot,
}

pub struct Carousel {
    config: CarouselConfig,
    layouts: LayoutRegistry,
    rig: Rig,
    tweens: TweenEngine<Target, Cue>,
    textures: Vec<TextureId>,
    audio: Option<Box<dyn AudioCue>>,
    /// 登場スピン + 無限回転（高々1つ）
    ambient: Option<TimelineId>,
    settle_call: Option<TweenId>,
    stage: Stage,
    driver: RotationDriver,
    hovered: Option<usize>,
    picked: Option<Pick>,
    drag: DragState,
    pointer: Pointer,
    current_layout: Option<LayoutKind>,
    intro_layout: LayoutKind,
    /// 最初の tick の時刻（Tweenエンジンはここを0とする）
    clock_origin: Option<f32>,
}

impl Carousel {
    /// 設定を検証し、平面を積み重ねた状態で初期化する
    pub fn new(config: CarouselConfig, context: CarouselContext) -> Result<Self, CarouselError> {
        let config = config.validate()?;
        let plane_count = config.plane_count;
        let intro_layout = config.intro_layout;

        let mut carousel = Self {
            layouts: LayoutRegistry::new(&config.layouts),
            drag: DragState::new(config.drag.damping, config.drag.sensitivity),
            config,
            rig: Rig::new(context.camera),
            tweens: TweenEngine::new(),
            textures: context.textures,
            audio: context.audio,
            ambient: None,
            settle_call: None,
            stage: Stage::Settling,
            driver: RotationDriver::Ambient,
            hovered: None,
            picked: None,
            pointer: Pointer::new(),
            current_layout: None,
            intro_layout,
            clock_origin: None,
        };
        carousel.initialize(plane_count, intro_layout)?;
        Ok(carousel)
    }

    /// 平面を作り直し、待ち時間の後に `layout` へ展開するアンビエントを予約する
    pub fn initialize(&mut self, plane_count: usize, layout: LayoutKind) -> Result<(), CarouselError> {
        if plane_count == 0 {
            return Err(CarouselError::Config("plane count must be at least 1".into()));
        }
        if self.textures.len() < plane_count {
            return Err(CarouselError::MissingTexture {
                index: self.textures.len(),
                planes: plane_count,
            });
        }

        self.tweens.kill_all();
        self.ambient = None;
        self.settle_call = None;

        let stack = *self.layouts.get(LayoutKind::Stack);
        let poses = stack.arrangement.poses(plane_count);
        self.rig
            .populate(&poses, &self.textures[..plane_count], self.config.wave_amplitude);
        let camera = self.rig.camera_mut();
        camera.set_position(stack.preset.camera_position);
        camera.set_rotation(stack.preset.camera_rotation);

        self.hovered = None;
        self.picked = None;
        self.drag.cancel();
        self.driver = RotationDriver::Ambient;
        self.stage = Stage::Settling;
        self.current_layout = Some(LayoutKind::Stack);
        self.intro_layout = layout;
        self.settle_call = Some(self.tweens.delay_call(self.config.settle_delay, Cue::Settled));

        log::info!("carousel initialized with {plane_count} planes (intro: {layout})");
        Ok(())
    }

    // ---- 毎フレーム ----

    /// 1フレーム進める
    ///
    /// Tween → 慣性 → シェーダー時刻 → ホバー判定 の順。
    pub fn tick(&mut self, elapsed: f32) {
        if self.stage == Stage::Disposed {
            return;
        }

        let origin = *self.clock_origin.get_or_insert(elapsed);
        let cues = self.tweens.advance(elapsed - origin, &mut self.rig);
        for cue in cues {
            self.dispatch(cue);
        }

        self.apply_momentum();

        for plane in self.rig.planes_mut() {
            plane.uniforms.time = elapsed;
        }

        if self.pointer.has_moved() && self.stage.is_animated() && self.picked.is_none() {
            self.hit_test(self.pointer.ndc());
        }
    }

    fn dispatch(&mut self, cue: Cue) {
        log::trace!("cue {cue:?}");
        match cue {
            Cue::Settled => {
                self.settle_call = None;
                self.start_ambient(self.intro_layout);
            }
            Cue::IntroComplete => {
                if self.stage == Stage::Intro {
                    self.stage = Stage::Steady;
                    log::info!("intro complete");
                }
            }
            Cue::PickArrived => {
                let Some(index) = self.picked.as_ref().map(|pick| pick.index) else {
                    return;
                };
                if let Some(world) = self.rig.plane_world(index) {
                    let target = world.transform_point3(Vec3::ZERO);
                    self.rig.camera_mut().look_at(target);
                }
                self.stage = Stage::Picked;
            }
            Cue::Restored => {
                self.picked = None;
                self.stage = Stage::Steady;
                self.engage(RotationDriver::Ambient);
                log::info!("restored");
            }
            Cue::LayoutSettled => {
                self.stage = Stage::Steady;
                self.engage(RotationDriver::Ambient);
            }
        }
    }

    fn apply_momentum(&mut self) {
        let decay = self.config.drag.ripple_decay;
        match self.drag.step(self.config.drag.epsilon) {
            Momentum::Coast(delta) => {
                self.rig.add_group_yaw(delta);
                for plane in self.rig.planes_mut() {
                    plane.uniforms.rotation_velocity = delta;
                }
            }
            Momentum::Held => self.decay_uniforms(decay),
            Momentum::Rest => {
                self.decay_uniforms(decay);
                if self.driver == RotationDriver::Drag {
                    self.engage(RotationDriver::Ambient);
                }
            }
        }
    }

    fn decay_uniforms(&mut self, factor: f32) {
        for plane in self.rig.planes_mut() {
            plane.uniforms.decay(factor);
        }
    }

    // ---- 回転の持ち主 ----

    /// グループ回転の持ち主を切り替える
    /// 許可されない遷移なら false
    pub fn engage(&mut self, next: RotationDriver) -> bool {
        if self.driver != next {
            if !self.driver.can_hand_over(next) {
                log::debug!("{next:?} cannot take the group rotation from {:?}", self.driver);
                return false;
            }
            log::debug!("rotation driver {:?} -> {next:?}", self.driver);
            self.driver = next;
        }
        self.sync_ambient();
        true
    }

    /// アンビエントは持ち主が Ambient かつホバーなしの時だけ進む
    fn sync_ambient(&mut self) {
        let Some(id) = self.ambient else {
            return;
        };
        if self.driver == RotationDriver::Ambient && self.hovered.is_none() {
            self.tweens.resume(id);
        } else {
            self.tweens.pause(id);
        }
    }

    /// アンビエントTimelineを差し替える（前のものは破棄）
    pub fn replace_ambient(&mut self, timeline: Timeline<Target, Cue>) -> TimelineId {
        if let Some(previous) = self.ambient.take() {
            self.tweens.kill_timeline(previous);
        }
        let id = self.tweens.play(timeline);
        self.ambient = Some(id);
        self.sync_ambient();
        id
    }

    fn start_ambient(&mut self, kind: LayoutKind) {
        let entry = *self.layouts.get(kind);
        let poses = entry.arrangement.poses(self.rig.plane_count());
        let timeline = choreography::ambient_timeline(&self.config.ambient, &entry.preset, &poses);
        self.current_layout = Some(kind);
        self.stage = Stage::Intro;
        self.replace_ambient(timeline);
        log::info!("ambient started ({kind})");
    }

    // ---- ホバー ----

    /// NDC上の最も手前の平面
    pub fn intersect(&self, ndc: Vec2) -> Option<Hit> {
        if self.rig.plane_count() == 0 {
            return None;
        }
        let ray = self.rig.camera().ray_from_ndc(ndc);
        pick_nearest(&ray, self.rig.plane_worlds(), self.config.half_extents())
    }

    /// ホバー判定
    ///
    /// 対象が変わったら前の平面を下ろし、新しい平面を持ち上げて効果音を鳴らす。
    /// ピック中は何もしない。
    pub fn hit_test(&mut self, ndc: Vec2) -> Option<usize> {
        if self.picked.is_some() || self.stage == Stage::Disposed {
            return None;
        }

        let hit = self.intersect(ndc).map(|hit| hit.index);
        if hit == self.hovered {
            return hit;
        }

        if let Some(previous) = self.hovered.take() {
            self.lower(previous);
        }
        if let Some(index) = hit {
            self.hovered = Some(index);
            self.lift(index);
            if let Some(cue) = self.audio.as_deref_mut() {
                audio::trigger(cue, self.config.audio_tail);
            }
        }
        self.sync_ambient();
        hit
    }

    /// 配置上の y（ホバーの基準）
    fn rest_y(&self, index: usize) -> f32 {
        self.current_layout
            .map(|kind| {
                self.layouts
                    .get(kind)
                    .arrangement
                    .pose(index, self.rig.plane_count())
                    .position
                    .y
            })
            .unwrap_or(0.0)
    }

    fn lift(&mut self, index: usize) {
        let y = self.rest_y(index) + self.config.hover.lift;
        self.tweens
            .start(Tween::new(Target::Plane(index), self.config.hover.duration).to(POS_Y, y));
    }

    fn lower(&mut self, index: usize) {
        self.tweens
            .kill_properties(Target::Plane(index), &Property::POSITION);
        let y = self.rest_y(index);
        self.tweens
            .start(Tween::new(Target::Plane(index), self.config.hover.duration).to(POS_Y, y));
    }

    // ---- ポインタ ----

    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.pointer.update_ndc(ndc);
    }

    pub fn pointer_moved_screen(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.pointer.update_screen(x, y, width, height);
    }

    /// ドラッグ開始（ピック中・配置切り替え中は無視）
    pub fn pointer_down(&mut self, x: f32) {
        if self.stage == Stage::Disposed || self.picked.is_some() {
            log::debug!("drag ignored in {:?}", self.stage);
            return;
        }
        if self.engage(RotationDriver::Drag) {
            self.drag.begin(x);
        }
    }

    pub fn pointer_move(&mut self, x: f32) {
        if self.driver != RotationDriver::Drag {
            return;
        }
        let Some(delta) = self.drag.update(x) else {
            return;
        };
        self.rig.add_group_yaw(delta);
        let ripple = (delta.abs() * self.config.drag.ripple_gain).min(1.0);
        for plane in self.rig.planes_mut() {
            plane.uniforms.rotation_velocity = delta;
            plane.uniforms.ripple_intensity = plane.uniforms.ripple_intensity.max(ripple);
        }
    }

    /// ドラッグ終了。残った速度は tick で慣性として消費する
    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    // ---- ピック ----

    /// クリック
    ///
    /// - ピック中: ピックした平面の上なら何もしない、それ以外なら復帰
    /// - ホバー中: その平面をピック
    /// - それ以外: 何もしない
    pub fn click(&mut self) {
        if self.stage == Stage::Disposed {
            return;
        }
        // ドラッグ直後のクリックだけを捨てる
        if self.drag.take_travel().abs() > self.config.drag.click_slop {
            log::debug!("click after drag ignored");
            return;
        }

        if let Some(picked) = self.picked.as_ref().map(|pick| pick.index) {
            let over_picked = self.pointer.has_moved()
                && self
                    .intersect(self.pointer.ndc())
                    .is_some_and(|hit| hit.index == picked);
            if over_picked {
                log::debug!("plane {picked} is already picked");
            } else {
                self.restore();
            }
            return;
        }

        match self.hovered {
            Some(index) => self.pick(index),
            None => log::debug!("click with nothing hovered"),
        }
    }

    fn pick(&mut self, index: usize) {
        let mut snapshot = self.rig.capture();
        // ホバーの持ち上げ分は保存しない
        for (i, pose) in snapshot.planes.iter_mut().enumerate() {
            pose.position.y = self.rest_y(i);
        }
        if let Some(previous) = self.hovered.take() {
            self.tweens
                .kill_properties(Target::Plane(previous), &Property::POSITION);
        }

        self.picked = Some(Pick { index, snapshot });
        self.stage = Stage::Picking;
        if let Some(cue) = self.audio.as_deref_mut() {
            cue.pause();
        }
        self.drag.cancel();
        self.engage(RotationDriver::Pick);

        let group_yaw = choreography::nearest_turn(self.rig.group_rotation().y);
        for tween in
            choreography::pick_tweens(&self.config.pick, index, self.rig.plane_count(), group_yaw)
        {
            self.tweens.start(tween);
        }
        log::info!("picked plane {index}");
    }

    /// ピック前の状態へ戻す（ピックなし・復帰中は何もしない）
    pub fn restore(&mut self) {
        if self.stage == Stage::Restoring {
            log::debug!("already restoring");
            return;
        }
        let tweens = match self.picked.as_ref() {
            Some(pick) => {
                choreography::restore_tweens(&pick.snapshot, self.config.pick.restore_duration)
            }
            None => {
                log::debug!("restore without a picked plane");
                return;
            }
        };

        // ピック演出（カメラ到着イベント含む）を止める
        self.tweens.kill_target(Target::Camera);
        self.tweens.kill_target(Target::Group);
        for index in 0..self.rig.plane_count() {
            self.tweens.kill_target(Target::Plane(index));
        }

        self.stage = Stage::Restoring;
        for tween in tweens {
            self.tweens.start(tween);
        }
        log::info!("restoring");
    }

    // ---- 配置 ----

    /// 名前で配置を切り替える（未登録の名前は無視して false）
    pub fn switch_layout(&mut self, name: &str) -> bool {
        match self.layouts.lookup(name) {
            Some(kind) => self.switch_layout_kind(kind),
            None => {
                log::debug!("unknown layout {name:?} ignored");
                false
            }
        }
    }

    /// 配置を切り替える
    ///
    /// アンビエントとピックを破棄し、カメラ・グループ・平面を配置の目標へ動かす。
    /// 完了後は静止したまま（無限回転は再開しない）。
    pub fn switch_layout_kind(&mut self, kind: LayoutKind) -> bool {
        if self.stage == Stage::Disposed {
            return false;
        }

        self.ambient = None;
        self.settle_call = None;
        self.tweens.kill_all();
        self.picked = None;
        self.hovered = None;
        self.drag.cancel();
        self.engage(RotationDriver::Layout);

        self.stage = Stage::Arranging;
        self.current_layout = Some(kind);

        let entry = *self.layouts.get(kind);
        let mut preset = entry.preset;
        preset.group_rotation.y += choreography::nearest_turn(self.rig.group_rotation().y);
        let poses = entry.arrangement.poses(self.rig.plane_count());
        for tween in
            choreography::layout_tweens(&preset, &poses, self.config.layouts.switch_duration)
        {
            self.tweens.start(tween);
        }
        log::info!("switching layout to {kind}");
        true
    }

    // ---- 破棄 ----

    /// 全Tweenを止め、ノードを削除して解放した平面のindexを返す
    /// 2回目以降は何もしない
    pub fn teardown(&mut self) -> Vec<usize> {
        if self.stage == Stage::Disposed {
            log::warn!("carousel already torn down");
            return Vec::new();
        }

        self.tweens.kill_all();
        self.ambient = None;
        self.settle_call = None;
        self.hovered = None;
        self.picked = None;
        self.drag.cancel();
        if let Some(cue) = self.audio.as_deref_mut() {
            cue.pause();
        }

        let released = self.rig.dismantle();
        self.stage = Stage::Disposed;
        log::info!("carousel torn down ({} planes released)", released.len());
        released
    }

    // ---- 参照 ----

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// 登場スピンが終わり、ホバーを受け付ける状態か
    pub fn is_animated(&self) -> bool {
        self.stage.is_animated()
    }

    pub fn driver(&self) -> RotationDriver {
        self.driver
    }

    pub fn interaction(&self) -> InteractionState {
        if let Some(pick) = &self.picked {
            InteractionState::Picked(pick.index)
        } else if self.drag.is_active() {
            InteractionState::Dragging
        } else if let Some(index) = self.hovered {
            InteractionState::Hovering(index)
        } else {
            InteractionState::Idle
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn picked(&self) -> Option<usize> {
        self.picked.as_ref().map(|pick| pick.index)
    }

    /// ピック中のみ存在する
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.picked.as_ref().map(|pick| &pick.snapshot)
    }

    pub fn current_layout(&self) -> Option<LayoutKind> {
        self.current_layout
    }

    pub fn ambient(&self) -> Option<TimelineId> {
        self.ambient
    }

    pub fn tweens(&self) -> &TweenEngine<Target, Cue> {
        &self.tweens
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn camera(&self) -> &Camera {
        self.rig.camera()
    }

    pub fn planes(&self) -> &[Plane] {
        self.rig.planes()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.rig.camera_mut().set_aspect(aspect);
    }

    pub fn set_audio(&mut self, audio: Option<Box<dyn AudioCue>>) {
        self.audio = audio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::FakeCue;
    use carousel_core::math::TAU;

    const FRAME: f32 = 1.0 / 60.0;

    fn textures(count: usize) -> Vec<TextureId> {
        (0..count as u32).map(TextureId).collect()
    }

    fn carousel_with(count: usize, audio: Option<Box<dyn AudioCue>>) -> Carousel {
        let config = CarouselConfig {
            plane_count: count,
            ..Default::default()
        };
        Carousel::new(
            config,
            CarouselContext {
                camera: Camera::new(1.0),
                textures: textures(count),
                audio,
            },
        )
        .unwrap()
    }

    /// 60fpsで時刻を進める
    struct Clock(f32);

    impl Clock {
        fn run(&mut self, carousel: &mut Carousel, seconds: f32) {
            let until = self.0 + seconds;
            while self.0 < until {
                self.0 += FRAME;
                carousel.tick(self.0);
            }
        }

        fn run_while(&mut self, carousel: &mut Carousel, condition: impl Fn(&Carousel) -> bool) {
            let mut frames = 0;
            while condition(carousel) {
                self.0 += FRAME;
                carousel.tick(self.0);
                frames += 1;
                assert!(frames < 60 * 30, "condition never settled");
            }
        }
    }

    /// 登場スピンまで終えたカルーセル
    fn steady(count: usize) -> (Carousel, Clock) {
        let mut carousel = carousel_with(count, None);
        let mut clock = Clock(0.0);
        carousel.tick(0.0);
        clock.run(&mut carousel, 4.2);
        assert_eq!(carousel.stage(), Stage::Steady);
        (carousel, clock)
    }

    fn plane_center(carousel: &Carousel, index: usize) -> Vec3 {
        carousel
            .rig()
            .plane_world(index)
            .unwrap()
            .transform_point3(Vec3::ZERO)
    }

    fn project(carousel: &Carousel, world: Vec3) -> Vec2 {
        let ndc = carousel.camera().project(world);
        Vec2::new(ndc.x, ndc.y)
    }

    /// 円の右端・左端にある平面の中心（NDC）
    /// 円形配置では両端の平面がカメラを向いている
    fn side_points(carousel: &Carousel) -> (Vec2, Vec2) {
        let centers: Vec<Vec3> = (0..carousel.planes().len())
            .map(|index| plane_center(carousel, index))
            .collect();
        let right = centers.iter().copied().max_by(|a, b| a.x.total_cmp(&b.x)).unwrap();
        let left = centers.iter().copied().min_by(|a, b| a.x.total_cmp(&b.x)).unwrap();
        (project(carousel, right), project(carousel, left))
    }

    /// 右端の平面にホバーし、その index を返す
    fn hover_right(carousel: &mut Carousel) -> usize {
        let (right, _) = side_points(carousel);
        carousel.hit_test(right).unwrap()
    }

    fn plane_y(carousel: &Carousel, index: usize) -> f32 {
        carousel.rig().plane_transform(index).unwrap().position.y
    }

    fn ambient_paused(carousel: &Carousel) -> bool {
        let id = carousel.ambient().unwrap();
        carousel.tweens().timeline(id).unwrap().is_paused()
    }

    fn assert_snapshot_close(a: &Snapshot, b: &Snapshot) {
        assert!((a.camera.position - b.camera.position).length() < 1e-3);
        assert!((a.camera.rotation - b.camera.rotation).length() < 1e-3);
        assert!((a.group_rotation - b.group_rotation).length() < 1e-3);
        assert_eq!(a.planes.len(), b.planes.len());
        for (pa, pb) in a.planes.iter().zip(&b.planes) {
            assert!((pa.position - pb.position).length() < 1e-3);
            assert!((pa.rotation - pb.rotation).length() < 1e-3);
        }
    }

    #[test]
    fn test_missing_texture_is_rejected() {
        let result = Carousel::new(
            CarouselConfig::default(),
            CarouselContext {
                camera: Camera::new(1.0),
                textures: textures(35),
                audio: None,
            },
        );
        assert!(matches!(
            result,
            Err(CarouselError::MissingTexture {
                index: 35,
                planes: 36
            })
        ));
    }

    #[test]
    fn test_initial_stacked_fan() {
        let carousel = carousel_with(36, None);
        assert_eq!(carousel.stage(), Stage::Settling);
        assert_eq!(carousel.planes().len(), 36);
        assert_eq!(carousel.current_layout(), Some(LayoutKind::Stack));
        for index in 0..36 {
            let transform = carousel.rig().plane_transform(index).unwrap();
            assert!((transform.position.z + index as f32 * 0.1).abs() < 1e-5);
            assert_eq!(transform.rotation, Vec3::ZERO);
        }
        assert_eq!(carousel.interaction(), InteractionState::Idle);
    }

    #[test]
    fn test_ambient_starts_after_settle() {
        let mut carousel = carousel_with(36, None);
        let mut clock = Clock(0.0);
        carousel.tick(0.0);
        clock.run(&mut carousel, 0.9);
        assert!(carousel.ambient().is_none());
        assert_eq!(carousel.stage(), Stage::Settling);

        clock.run(&mut carousel, 0.2);
        assert!(carousel.ambient().is_some());
        assert_eq!(carousel.stage(), Stage::Intro);
        assert!(!carousel.is_animated());
    }

    #[test]
    fn test_clock_origin_is_first_tick() {
        let mut carousel = carousel_with(4, None);
        let mut clock = Clock(120.0);
        carousel.tick(120.0);
        clock.run(&mut carousel, 0.5);
        assert!(carousel.ambient().is_none());
        assert_eq!(carousel.planes()[0].uniforms.time, clock.0);
    }

    #[test]
    fn test_intro_spreads_to_circle() {
        let (mut carousel, mut clock) = steady(36);

        for index in 0..36 {
            let angle = index as f32 / 36.0 * TAU;
            let transform = carousel.rig().plane_transform(index).unwrap();
            assert!((transform.position.length() - 5.0).abs() < 1e-3);
            assert!((transform.position.x - 5.0 * angle.cos()).abs() < 1e-3);
            assert!((transform.rotation.y + angle).abs() < 1e-3);
        }
        assert!((carousel.camera().position.z - 15.0).abs() < 1e-3);
        assert!(carousel.tweens().has_repeating());
        assert_eq!(carousel.current_layout(), Some(LayoutKind::Circular));

        // 無限回転
        let before = carousel.rig().group_rotation().y;
        clock.run(&mut carousel, 1.0);
        let after = carousel.rig().group_rotation().y;
        assert!((after - before - TAU / 30.0).abs() < 0.01);
    }

    #[test]
    fn test_hit_test_empty_space() {
        let (mut carousel, _) = steady(36);
        assert_eq!(carousel.hit_test(Vec2::new(0.0, 0.95)), None);
        assert_eq!(carousel.hovered(), None);
        assert!(!ambient_paused(&carousel));
    }

    #[test]
    fn test_hit_test_without_planes() {
        let (mut carousel, _) = steady(4);
        carousel.teardown();
        assert_eq!(carousel.intersect(Vec2::ZERO), None);
        assert_eq!(carousel.hit_test(Vec2::ZERO), None);
    }

    #[test]
    fn test_hover_switch_lowers_previous() {
        let (mut carousel, mut clock) = steady(36);
        let (right, left) = side_points(&carousel);
        let a = carousel.hit_test(right).unwrap();
        assert_eq!(carousel.hovered(), Some(a));
        assert_eq!(carousel.interaction(), InteractionState::Hovering(a));
        assert!(ambient_paused(&carousel));

        clock.run(&mut carousel, 0.6);
        assert!((plane_y(&carousel, a) - 0.25).abs() < 1e-4);

        let b = carousel.hit_test(left).unwrap();
        assert_ne!(a, b);
        assert_eq!(carousel.hovered(), Some(b));
        clock.run(&mut carousel, 0.6);
        assert!(plane_y(&carousel, a).abs() < 1e-4);
        assert!((plane_y(&carousel, b) - 0.25).abs() < 1e-4);

        // ホバーが外れたらアンビエント再開
        assert_eq!(carousel.hit_test(Vec2::new(0.0, 0.95)), None);
        assert!(!ambient_paused(&carousel));
    }

    #[test]
    fn test_hover_plays_audio_cue() {
        let cue = FakeCue::default();
        cue.0.borrow_mut().duration = 1.0;
        let mut carousel = carousel_with(36, Some(Box::new(cue.clone())));
        let mut clock = Clock(0.0);
        carousel.tick(0.0);
        clock.run(&mut carousel, 4.2);

        hover_right(&mut carousel);
        assert_eq!(cue.0.borrow().plays, 1);

        carousel.click();
        assert!(!cue.0.borrow().playing);
        assert_eq!(cue.0.borrow().pauses, 1);
    }

    #[test]
    fn test_click_with_nothing_is_noop() {
        let (mut carousel, _) = steady(36);
        let before = carousel.rig().capture();
        carousel.click();
        assert_eq!(carousel.stage(), Stage::Steady);
        assert_eq!(carousel.picked(), None);
        assert!(carousel.snapshot().is_none());
        assert_eq!(carousel.rig().capture(), before);
    }

    #[test]
    fn test_restore_without_pick_is_noop() {
        let (mut carousel, _) = steady(8);
        let tweens = carousel.tweens().tween_count(Target::Camera);
        carousel.restore();
        assert_eq!(carousel.stage(), Stage::Steady);
        assert_eq!(carousel.tweens().tween_count(Target::Camera), tweens);
    }

    #[test]
    fn test_pick_choreography() {
        let (mut carousel, mut clock) = steady(36);
        let a = hover_right(&mut carousel);
        carousel.click();

        assert_eq!(carousel.stage(), Stage::Picking);
        assert_eq!(carousel.picked(), Some(a));
        assert_eq!(carousel.hovered(), None);
        assert!(carousel.snapshot().is_some());
        assert_eq!(carousel.interaction(), InteractionState::Picked(a));
        assert_eq!(carousel.driver(), RotationDriver::Pick);
        assert!(ambient_paused(&carousel));
        assert!(!carousel.is_animated());

        clock.run(&mut carousel, 3.0);
        assert_eq!(carousel.stage(), Stage::Picked);
        let transform = carousel.rig().plane_transform(a).unwrap();
        assert!(transform.position.length() < 1e-3);
        assert!(transform.rotation.length() < 1e-3);
        for index in (0..36).filter(|&i| i != a) {
            assert!((plane_y(&carousel, index) + 10.0).abs() < 1e-3);
        }
        assert!((carousel.camera().position - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-3);
        assert!(carousel.camera().rotation.length() < 1e-3);
        let yaw = carousel.rig().group_rotation().y;
        assert!((yaw - choreography::nearest_turn(yaw)).abs() < 1e-3);
    }

    #[test]
    fn test_no_hover_while_picked() {
        let (mut carousel, mut clock) = steady(36);
        hover_right(&mut carousel);
        carousel.click();
        clock.run(&mut carousel, 3.0);

        assert_eq!(carousel.hit_test(Vec2::ZERO), None);
        assert_eq!(carousel.hovered(), None);
        carousel.pointer_moved(Vec2::ZERO);
        clock.run(&mut carousel, 0.1);
        assert_eq!(carousel.hovered(), None);
    }

    #[test]
    fn test_click_on_picked_plane_is_noop() {
        let (mut carousel, mut clock) = steady(36);
        let a = hover_right(&mut carousel);
        carousel.click();
        clock.run(&mut carousel, 3.0);

        // ピックした平面は画面中央
        carousel.pointer_moved(Vec2::ZERO);
        let before = carousel.rig().capture();
        carousel.click();
        assert_eq!(carousel.stage(), Stage::Picked);
        assert_eq!(carousel.picked(), Some(a));
        assert_eq!(carousel.rig().capture(), before);
    }

    #[test]
    fn test_pick_then_restore_returns_everything() {
        let (mut carousel, mut clock) = steady(36);
        hover_right(&mut carousel);
        let before = carousel.rig().capture();
        carousel.click();
        assert_snapshot_close(carousel.snapshot().unwrap(), &before);

        clock.run(&mut carousel, 3.0);
        carousel.pointer_moved(Vec2::new(0.0, 0.9));
        carousel.click();
        assert_eq!(carousel.stage(), Stage::Restoring);

        // 復帰中の再要求は無視
        carousel.restore();
        assert_eq!(carousel.stage(), Stage::Restoring);

        clock.run_while(&mut carousel, |c| c.stage() == Stage::Restoring);
        assert_eq!(carousel.stage(), Stage::Steady);
        assert!(carousel.is_animated());
        assert_eq!(carousel.picked(), None);
        assert!(carousel.snapshot().is_none());
        assert_snapshot_close(&carousel.rig().capture(), &before);
        assert_eq!(carousel.driver(), RotationDriver::Ambient);
        assert!(!ambient_paused(&carousel));
    }

    #[test]
    fn test_restore_during_pick_flight() {
        let (mut carousel, mut clock) = steady(36);
        hover_right(&mut carousel);
        let before = carousel.rig().capture();
        carousel.click();
        clock.run(&mut carousel, 0.5);

        carousel.restore();
        clock.run_while(&mut carousel, |c| c.stage() == Stage::Restoring);
        // カメラ到着イベントは破棄されている
        assert_eq!(carousel.stage(), Stage::Steady);
        assert_snapshot_close(&carousel.rig().capture(), &before);
    }

    #[test]
    fn test_drag_rotates_group_and_coasts() {
        let (mut carousel, mut clock) = steady(36);
        let yaw = carousel.rig().group_rotation().y;

        carousel.pointer_down(100.0);
        assert_eq!(carousel.driver(), RotationDriver::Drag);
        assert_eq!(carousel.interaction(), InteractionState::Dragging);
        assert!(ambient_paused(&carousel));

        carousel.pointer_move(140.0);
        let delta = 40.0 * 0.005;
        assert!((carousel.rig().group_rotation().y - yaw - delta).abs() < 1e-5);
        assert!(carousel.planes().iter().all(|p| p.uniforms.rotation_velocity == delta));
        assert!(carousel.planes()[0].uniforms.ripple_intensity > 0.0);

        carousel.pointer_up();
        for n in 1..=10 {
            clock.run(&mut carousel, FRAME * 0.5);
            let expected = delta * 0.95_f32.powi(n);
            assert!((carousel.drag().velocity() - expected).abs() < 1e-5);
        }
        assert_eq!(carousel.driver(), RotationDriver::Drag);

        clock.run_while(&mut carousel, |c| c.driver() == RotationDriver::Drag);
        assert_eq!(carousel.drag().velocity(), 0.0);
        assert!(!ambient_paused(&carousel));
    }

    #[test]
    fn test_drag_ignored_while_picked() {
        let (mut carousel, mut clock) = steady(36);
        hover_right(&mut carousel);
        carousel.click();
        clock.run(&mut carousel, 3.0);

        let yaw = carousel.rig().group_rotation().y;
        carousel.pointer_down(0.0);
        carousel.pointer_move(200.0);
        carousel.pointer_up();
        clock.run(&mut carousel, 0.1);
        assert_eq!(carousel.rig().group_rotation().y, yaw);
        assert_eq!(carousel.driver(), RotationDriver::Pick);
    }

    #[test]
    fn test_click_after_drag_does_not_pick() {
        let (mut carousel, _) = steady(36);
        let a = hover_right(&mut carousel);
        carousel.pointer_down(0.0);
        carousel.pointer_move(50.0);
        carousel.pointer_up();
        carousel.click();
        assert_eq!(carousel.picked(), None);
        assert_eq!(carousel.hovered(), Some(a));
    }

    #[test]
    fn test_click_after_momentum_rests_picks() {
        let (mut carousel, mut clock) = steady(36);
        carousel.pointer_down(0.0);
        carousel.pointer_move(50.0);
        carousel.pointer_up();
        clock.run_while(&mut carousel, |c| c.drag().velocity() != 0.0);
        clock.run(&mut carousel, 0.5);

        let a = hover_right(&mut carousel);
        carousel.click();
        assert_eq!(carousel.picked(), Some(a));
    }

    #[test]
    fn test_switch_layout_kills_ambient() {
        let (mut carousel, mut clock) = steady(36);
        let ambient = carousel.ambient().unwrap();

        assert!(carousel.switch_layout("LINEAR"));
        assert!(carousel.tweens().timeline(ambient).is_none());
        assert!(!carousel.tweens().has_repeating());
        assert_eq!(carousel.ambient(), None);
        assert_eq!(carousel.stage(), Stage::Arranging);
        assert_eq!(carousel.current_layout(), Some(LayoutKind::Linear));

        clock.run(&mut carousel, 1.6);
        assert_eq!(carousel.stage(), Stage::Steady);
        let preset = carousel.layouts().preset(LayoutKind::Linear);
        assert!((carousel.camera().position - preset.camera_position).length() < 1e-3);
        let poses = carousel.layouts().arrange(LayoutKind::Linear, 36);
        for (index, pose) in poses.iter().enumerate() {
            let transform = carousel.rig().plane_transform(index).unwrap();
            assert!((transform.position - pose.position).length() < 1e-3);
        }

        // 静止したまま
        let yaw = carousel.rig().group_rotation().y;
        clock.run(&mut carousel, 1.0);
        assert_eq!(carousel.rig().group_rotation().y, yaw);
    }

    #[test]
    fn test_unknown_layout_is_ignored() {
        let (mut carousel, _) = steady(8);
        let ambient = carousel.ambient();
        assert!(!carousel.switch_layout("spiral"));
        assert_eq!(carousel.stage(), Stage::Steady);
        assert_eq!(carousel.ambient(), ambient);
        assert!(carousel.tweens().has_repeating());
    }

    #[test]
    fn test_switch_layout_drops_pick() {
        let (mut carousel, mut clock) = steady(36);
        hover_right(&mut carousel);
        carousel.click();
        clock.run(&mut carousel, 1.0);

        assert!(carousel.switch_layout("stack"));
        assert_eq!(carousel.picked(), None);
        assert!(carousel.snapshot().is_none());
        assert_eq!(carousel.driver(), RotationDriver::Layout);

        clock.run(&mut carousel, 1.6);
        assert_eq!(carousel.stage(), Stage::Steady);
        assert_eq!(carousel.driver(), RotationDriver::Ambient);
        assert!(carousel.camera().rotation.length() < 1e-3);
    }

    #[test]
    fn test_switch_before_settle_cancels_ambient() {
        let mut carousel = carousel_with(8, None);
        let mut clock = Clock(0.0);
        carousel.tick(0.0);
        carousel.switch_layout("circular");
        clock.run(&mut carousel, 3.0);
        assert_eq!(carousel.ambient(), None);
        assert_eq!(carousel.stage(), Stage::Steady);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let (mut carousel, mut clock) = steady(36);
        let released = carousel.teardown();
        assert_eq!(released, (0..36).collect::<Vec<_>>());
        assert_eq!(carousel.stage(), Stage::Disposed);
        assert_eq!(carousel.rig().scene().node_count(), 0);
        assert_eq!(carousel.tweens().timeline_count(), 0);

        assert!(carousel.teardown().is_empty());
        clock.run(&mut carousel, 0.5);
        carousel.click();
        assert!(!carousel.switch_layout("linear"));
    }

    #[test]
    fn test_reinitialize_after_teardown() {
        let (mut carousel, mut clock) = steady(8);
        carousel.teardown();
        carousel.initialize(6, LayoutKind::Linear).unwrap();
        assert_eq!(carousel.planes().len(), 6);
        assert_eq!(carousel.stage(), Stage::Settling);
        clock.run(&mut carousel, 1.1);
        assert_eq!(carousel.current_layout(), Some(LayoutKind::Linear));
        assert!(matches!(
            carousel.initialize(9, LayoutKind::Stack),
            Err(CarouselError::MissingTexture { .. })
        ));
    }
}
