/// ホバー時に鳴らす効果音
///
/// ブラウザでは `HtmlAudioElement`、テストでは偽物を使う。
pub trait AudioCue {
    fn is_playing(&self) -> bool;
    /// 再生位置（秒）
    fn position(&self) -> f32;
    /// 長さ（秒）。不明なら NaN
    fn duration(&self) -> f32;
    fn rewind(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
}

/// 停止中、または終端から tail 秒以内なら頭から鳴らし直す
/// 鳴らした場合 true
pub fn trigger(cue: &mut dyn AudioCue, tail: f32) -> bool {
    let duration = cue.duration();
    let near_end = duration.is_finite() && duration - cue.position() <= tail;
    if cue.is_playing() && !near_end {
        return false;
    }
    cue.rewind();
    cue.play();
    true
}
