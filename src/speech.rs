use crate::core::{constants::VOICE_RATE, Announcement};
use web_sys as web;

/// Fire-and-forget speech output. Any failure (no synthesis support,
/// blocked by autoplay policy) leaves the app silent.
#[derive(Clone)]
pub struct Speech {
    synth: Option<web::SpeechSynthesis>,
}

impl Speech {
    pub fn new() -> Self {
        let synth = web::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            log::warn!("[voice] speech synthesis unavailable; continuing silently");
        }
        Self { synth }
    }

    /// Cancel whatever is playing and speak `announcement`.
    pub fn say(&self, announcement: &Announcement) {
        let Some(synth) = &self.synth else {
            return;
        };
        let utterance = match web::SpeechSynthesisUtterance::new_with_text(&announcement.text) {
            Ok(u) => u,
            Err(e) => {
                log::debug!("[voice] utterance error: {:?}", e);
                return;
            }
        };
        utterance.set_lang(announcement.locale());
        utterance.set_rate(VOICE_RATE);
        synth.cancel();
        synth.speak(&utterance);
    }

    pub fn cancel(&self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
    }
}
