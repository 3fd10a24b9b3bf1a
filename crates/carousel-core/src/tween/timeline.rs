use super::property::Animatable;
use super::tween::{Tween, TweenRun};

/// Timeline上の配置位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Timeline先頭からの絶対時刻
    At(f32),
    /// 直前のセグメントと同時に開始
    WithPrevious,
    /// 直前のセグメント終了からの相対時刻（負値で重ねる）
    AfterPrevious(f32),
}

struct Segment<K, E> {
    start: f32,
    run: TweenRun<K, E>,
}

/// 複数のTweenを時間軸上に並べたシーケンス
/// 一時停止中は時間が進まない
pub struct Timeline<K, E> {
    segments: Vec<Segment<K, E>>,
    elapsed: f32,
    paused: bool,
    last_start: f32,
    last_end: f32,
}

impl<K: Copy, E> Timeline<K, E> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            elapsed: 0.0,
            paused: false,
            last_start: 0.0,
            last_end: 0.0,
        }
    }

    /// Tweenを配置
    pub fn add(mut self, tween: Tween<K, E>, position: Position) -> Self {
        let start = match position {
            Position::At(t) => t,
            Position::WithPrevious => self.last_start,
            Position::AfterPrevious(offset) => self.last_end + offset,
        }
        .max(0.0);

        self.last_start = start;
        self.last_end = start + tween.span();
        self.segments.push(Segment {
            start,
            run: TweenRun::new(tween),
        });
        self
    }

    /// 各セグメントの開始時刻
    pub fn starts(&self) -> Vec<f32> {
        self.segments.iter().map(|segment| segment.start).collect()
    }

    /// 先頭からの経過時間
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// リピートを含むセグメントがあるか
    pub fn repeats(&self) -> bool {
        self.segments.iter().any(|segment| segment.run.tween.repeat)
    }

    /// 全セグメントが完了したか（リピートがある限り完了しない）
    pub fn is_finished(&self) -> bool {
        self.segments.iter().all(|segment| segment.run.is_finished())
    }

    /// ターゲットに書き込むセグメントを含むか
    pub fn drives(&self, target: K) -> bool
    where
        K: PartialEq,
    {
        self.segments
            .iter()
            .any(|segment| segment.run.tween.target == target && !segment.run.is_finished())
    }

    /// 時間を進めて値を書き込み、完了イベントを cues に追加
    pub(crate) fn step<H: Animatable<K>>(&mut self, dt: f32, host: &mut H, cues: &mut Vec<E>) {
        if self.paused {
            return;
        }
        self.elapsed += dt;

        for segment in &mut self.segments {
            let local = self.elapsed - segment.start;
            if local < 0.0 {
                continue;
            }
            if let Some(cue) = segment.run.seek(local, host) {
                cues.push(cue);
            }
        }
    }
}

impl<K: Copy, E> Default for Timeline<K, E> {
    fn default() -> Self {
        Self::new()
    }
}
