//! `<audio>` 要素によるホバー効果音

use carousel_interaction::AudioCue;
use web_sys::HtmlAudioElement;

pub struct HtmlAudioCue {
    element: HtmlAudioElement,
}

impl HtmlAudioCue {
    pub fn new(element: HtmlAudioElement) -> Self {
        Self { element }
    }
}

impl AudioCue for HtmlAudioCue {
    fn is_playing(&self) -> bool {
        !self.element.paused() && !self.element.ended()
    }

    fn position(&self) -> f32 {
        self.element.current_time() as f32
    }

    fn duration(&self) -> f32 {
        self.element.duration() as f32
    }

    fn rewind(&mut self) {
        self.element.set_current_time(0.0);
    }

    fn play(&mut self) {
        // 自動再生ポリシーで拒否されることがある
        if let Err(e) = self.element.play() {
            log::debug!("audio play rejected: {e:?}");
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            log::debug!("audio pause failed: {e:?}");
        }
    }
}
