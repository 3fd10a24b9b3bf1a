use super::property::{Animatable, Property};
use super::timeline::Timeline;
use super::tween::{Tween, TweenRun};

/// 単体Tween・遅延コールのハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

/// Timelineのハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineId(u64);

struct ActiveTween<K, E> {
    id: TweenId,
    started_at: f32,
    run: TweenRun<K, E>,
}

struct DelayedCall<E> {
    id: TweenId,
    fire_at: f32,
    cue: E,
}

/// Tweenスケジューラ
///
/// - `K`: 書き込み先ターゲットの識別子
/// - `E`: 完了時に返すイベント（コールバックの代わり）
///
/// `advance` は毎フレーム呼び出し、完了したTween/Timelineセグメント/遅延コールの
/// イベントを発火順に返す。
pub struct TweenEngine<K, E> {
    now: f32,
    next_id: u64,
    tweens: Vec<ActiveTween<K, E>>,
    timelines: Vec<(TimelineId, Timeline<K, E>)>,
    calls: Vec<DelayedCall<E>>,
}

impl<K: Copy + PartialEq, E> TweenEngine<K, E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            tweens: Vec::new(),
            timelines: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// 最後に advance した時刻
    pub fn now(&self) -> f32 {
        self.now
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// 単体Tweenを開始
    /// 同じターゲット・同じプロパティに書き込む既存Tweenは先にキャンセルされる
    pub fn start(&mut self, tween: Tween<K, E>) -> TweenId {
        let properties: Vec<Property> = tween.channels().iter().map(|c| c.property()).collect();
        let target = *tween.target();
        let cancelled = self.kill_properties(target, &properties);
        if cancelled > 0 {
            log::trace!("overwrote {cancelled} tween(s)");
        }

        let id = TweenId(self.allocate());
        self.tweens.push(ActiveTween {
            id,
            started_at: self.now,
            run: TweenRun::new(tween),
        });
        id
    }

    /// delay 秒後にイベントを発火
    pub fn delay_call(&mut self, delay: f32, cue: E) -> TweenId {
        let id = TweenId(self.allocate());
        self.calls.push(DelayedCall {
            id,
            fire_at: self.now + delay.max(0.0),
            cue,
        });
        id
    }

    /// Timelineを再生
    pub fn play(&mut self, timeline: Timeline<K, E>) -> TimelineId {
        let id = TimelineId(self.allocate());
        self.timelines.push((id, timeline));
        id
    }

    /// Tweenまたは遅延コールをキャンセル（完了イベントは発火しない）
    pub fn kill(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len() + self.calls.len();
        self.tweens.retain(|active| active.id != id);
        self.calls.retain(|call| call.id != id);
        before != self.tweens.len() + self.calls.len()
    }

    /// ターゲットの単体Tweenをすべてキャンセル
    pub fn kill_target(&mut self, target: K) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|active| *active.run.tween.target() != target);
        before - self.tweens.len()
    }

    /// ターゲットの指定プロパティに書き込む単体Tweenをキャンセル
    pub fn kill_properties(&mut self, target: K, properties: &[Property]) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|active| {
            *active.run.tween.target() != target || !active.run.tween.touches(properties)
        });
        before - self.tweens.len()
    }

    /// Timelineを破棄
    pub fn kill_timeline(&mut self, id: TimelineId) -> bool {
        let before = self.timelines.len();
        self.timelines.retain(|(timeline_id, _)| *timeline_id != id);
        before != self.timelines.len()
    }

    /// 全Tween・Timeline・遅延コールを破棄
    pub fn kill_all(&mut self) {
        self.tweens.clear();
        self.timelines.clear();
        self.calls.clear();
    }

    pub fn pause(&mut self, id: TimelineId) -> bool {
        self.timeline_mut(id).map(Timeline::pause).is_some()
    }

    pub fn resume(&mut self, id: TimelineId) -> bool {
        self.timeline_mut(id).map(Timeline::resume).is_some()
    }

    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline<K, E>> {
        self.timelines
            .iter()
            .find(|(timeline_id, _)| *timeline_id == id)
            .map(|(_, timeline)| timeline)
    }

    fn timeline_mut(&mut self, id: TimelineId) -> Option<&mut Timeline<K, E>> {
        self.timelines
            .iter_mut()
            .find(|(timeline_id, _)| *timeline_id == id)
            .map(|(_, timeline)| timeline)
    }

    /// Tween・遅延コールが残っているか
    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|active| active.id == id)
            || self.calls.iter().any(|call| call.id == id)
    }

    /// ターゲットに対する単体Tween数
    pub fn tween_count(&self, target: K) -> usize {
        self.tweens
            .iter()
            .filter(|active| *active.run.tween.target() == target)
            .count()
    }

    /// 実行中のTimeline数
    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    /// リピートセグメントを持つTimelineが残っているか
    pub fn has_repeating(&self) -> bool {
        self.timelines.iter().any(|(_, timeline)| timeline.repeats())
    }

    /// 時刻 now まで進める
    /// Timeline → 単体Tween → 遅延コールの順に処理し、完了イベントを返す
    pub fn advance<H: Animatable<K>>(&mut self, now: f32, host: &mut H) -> Vec<E> {
        let dt = (now - self.now).max(0.0);
        self.now = self.now.max(now);
        let mut cues = Vec::new();

        for (_, timeline) in &mut self.timelines {
            timeline.step(dt, host, &mut cues);
        }
        self.timelines.retain(|(_, timeline)| !timeline.is_finished());

        for active in &mut self.tweens {
            if let Some(cue) = active.run.seek(self.now - active.started_at, host) {
                cues.push(cue);
            }
        }
        self.tweens.retain(|active| !active.run.is_finished());

        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.calls.drain(..).partition(|call| call.fire_at <= now);
        self.calls = pending;
        cues.extend(due.into_iter().map(|call| call.cue));

        cues
    }
}

impl<K: Copy + PartialEq, E> Default for TweenEngine<K, E> {
    fn default() -> Self {
        Self::new()
    }
}
