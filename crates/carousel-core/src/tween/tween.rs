use crate::math::{lerp, Vec3};

use super::easing::Easing;
use super::property::{Animatable, Axis, Property};

/// 補間チャネル
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channel {
    /// 開始値から絶対値へ補間
    To { property: Property, value: f32 },
    /// 現在値に差分を加算（他の書き込みと合成される）
    By { property: Property, delta: f32 },
}

impl Channel {
    pub fn property(&self) -> Property {
        match *self {
            Channel::To { property, .. } | Channel::By { property, .. } => property,
        }
    }
}

/// Tween定義
/// ターゲットのプロパティ群を duration 秒かけて補間する
#[derive(Debug, Clone)]
pub struct Tween<K, E> {
    pub(crate) target: K,
    pub(crate) channels: Vec<Channel>,
    pub(crate) duration: f32,
    pub(crate) delay: f32,
    pub(crate) easing: Easing,
    pub(crate) repeat: bool,
    pub(crate) on_complete: Option<E>,
}

impl<K, E> Tween<K, E> {
    /// 新しいTweenを作成
    pub fn new(target: K, duration: f32) -> Self {
        Self {
            target,
            channels: Vec::new(),
            duration: duration.max(0.0),
            delay: 0.0,
            easing: Easing::default(),
            repeat: false,
            on_complete: None,
        }
    }

    /// 絶対値チャネルを追加
    pub fn to(mut self, property: Property, value: f32) -> Self {
        self.channels.push(Channel::To { property, value });
        self
    }

    /// 加算チャネルを追加
    pub fn by(mut self, property: Property, delta: f32) -> Self {
        self.channels.push(Channel::By { property, delta });
        self
    }

    /// 位置3成分を目標値へ
    pub fn position_to(self, target: Vec3) -> Self {
        Axis::ALL
            .into_iter()
            .fold(self, |tween, axis| tween.to(Property::Position(axis), axis.get(target)))
    }

    /// 回転3成分を目標値へ
    pub fn rotation_to(self, target: Vec3) -> Self {
        Axis::ALL
            .into_iter()
            .fold(self, |tween, axis| tween.to(Property::Rotation(axis), axis.get(target)))
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// 無限リピート
    pub fn repeat_forever(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// 完了時に返すイベント
    pub fn on_complete(mut self, cue: E) -> Self {
        self.on_complete = Some(cue);
        self
    }

    pub fn target(&self) -> &K {
        &self.target
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// 1周期の終了時刻（delay込み）
    pub fn span(&self) -> f32 {
        self.delay + self.duration
    }

    /// 指定プロパティのいずれかに書き込むか
    pub(crate) fn touches(&self, properties: &[Property]) -> bool {
        self.channels
            .iter()
            .any(|channel| properties.contains(&channel.property()))
    }
}

/// チャネルの実行状態
#[derive(Debug, Clone, Copy)]
struct ChannelState {
    channel: Channel,
    /// 開始時にキャプチャした値（To用）
    from: f32,
    /// これまでに適用した累積進捗（By用）
    applied: f32,
}

/// 実行中のTween
#[derive(Debug)]
pub(crate) struct TweenRun<K, E> {
    pub(crate) tween: Tween<K, E>,
    states: Vec<ChannelState>,
    started: bool,
    finished: bool,
}

impl<K: Copy, E> TweenRun<K, E> {
    pub(crate) fn new(tween: Tween<K, E>) -> Self {
        Self {
            tween,
            states: Vec::new(),
            started: false,
            finished: false,
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    /// ローカル時刻 `local` の状態を書き込む
    /// 完了した瞬間のみ完了イベントを返す
    pub(crate) fn seek<H: Animatable<K>>(&mut self, local: f32, host: &mut H) -> Option<E> {
        if self.finished {
            return None;
        }

        let active = local - self.tween.delay;
        if active < 0.0 {
            return None;
        }

        let target = self.tween.target;
        if !self.started {
            // 開始値は遅延が明けた時点でキャプチャする
            self.states = self
                .tween
                .channels
                .iter()
                .map(|&channel| ChannelState {
                    channel,
                    from: host.read(target, channel.property()).unwrap_or(0.0),
                    applied: 0.0,
                })
                .collect();
            self.started = true;
        }

        let raw = if self.tween.duration <= 0.0 {
            1.0
        } else {
            active / self.tween.duration
        };

        let (cycle, total, done) = if self.tween.repeat {
            let iteration = raw.floor();
            let cycle = self.tween.easing.evaluate(raw - iteration);
            (cycle, iteration + cycle, false)
        } else if raw >= 1.0 {
            (1.0, 1.0, true)
        } else {
            let cycle = self.tween.easing.evaluate(raw);
            (cycle, cycle, false)
        };

        for state in &mut self.states {
            match state.channel {
                Channel::To { property, value } => {
                    host.write(target, property, lerp(state.from, value, cycle));
                }
                Channel::By { property, delta } => {
                    if let Some(current) = host.read(target, property) {
                        host.write(target, property, current + delta * (total - state.applied));
                    }
                    state.applied = total;
                }
            }
        }

        if done {
            self.finished = true;
            return self.tween.on_complete.take();
        }
        None
    }
}
