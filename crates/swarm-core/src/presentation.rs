//! Ambient presentation driven by the hand state: material tint, emissive
//! glow, bloom intensity and one-shot voice announcements.
//!
//! Nothing here feeds back into the simulation. All visual values use the
//! same exponential blend as the particles; announcements fire on rising
//! edges only and stay silent until audio is unlocked by a user gesture.

use crate::constants::*;
use crate::formation::Formation;
use crate::gesture::{HandState, LoveMode};
use glam::Vec3;

/// Something to say, in the fixed voice locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
}

impl Announcement {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn locale(&self) -> &'static str {
        VOICE_LOCALE
    }
}

/// Values consumed by the renderer once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Look {
    pub tint: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub bloom: f32,
}

impl Default for Look {
    fn default() -> Self {
        Self {
            tint: Vec3::ONE,
            emissive: Vec3::from_array(TINT_SCATTER),
            emissive_intensity: EMISSIVE_SCATTER,
            bloom: BLOOM_IDLE,
        }
    }
}

/// Tint color and emissive intensity targets for a formation. Glyph shares
/// the idle look.
pub fn material_target(formation: Formation) -> (Vec3, f32) {
    match formation {
        Formation::Heart => (Vec3::from_array(TINT_LOVE), EMISSIVE_LOVE),
        Formation::Pyramid => (Vec3::from_array(TINT_PYRAMID), EMISSIVE_PYRAMID),
        Formation::Sphere => (Vec3::from_array(TINT_SPHERE), EMISSIVE_SPHERE),
        Formation::Glyph | Formation::Scatter => (Vec3::from_array(TINT_SCATTER), EMISSIVE_SCATTER),
    }
}

pub fn bloom_target(state: &HandState) -> f32 {
    if state.love_mode.is_active() {
        BLOOM_LOVE
    } else if state.is_triangle {
        BLOOM_PYRAMID
    } else if state.is_pinch {
        BLOOM_PINCH
    } else if state.grip > BLOOM_GRIP_MIN {
        BLOOM_GRIP
    } else {
        BLOOM_IDLE
    }
}

#[derive(Clone, Debug)]
pub struct PresentationController {
    look: Look,
    voice_enabled: bool,
    was_love: LoveMode,
    was_triangle: bool,
    was_pinch: bool,
    last_finger_count: Option<u8>,
}

impl Default for PresentationController {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationController {
    pub fn new() -> Self {
        Self {
            look: Look::default(),
            voice_enabled: false,
            was_love: LoveMode::None,
            was_triangle: false,
            was_pinch: false,
            last_finger_count: None,
        }
    }

    #[inline]
    pub fn look(&self) -> Look {
        self.look
    }

    #[inline]
    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    /// One-time audio unlock. Returns the greeting on the first call only.
    pub fn unlock_voice(&mut self) -> Option<Announcement> {
        if self.voice_enabled {
            return None;
        }
        self.voice_enabled = true;
        log::info!("[voice] unlocked");
        Some(Announcement::new(PHRASE_UNLOCKED))
    }

    /// Advance one tick. Returns the announcement to speak, if any; when
    /// several edges fire together the last one wins, as each new utterance
    /// cancels the one before it.
    pub fn update(&mut self, state: &HandState) -> Option<Announcement> {
        self.blend_look(state);
        let said = self.detect_edges(state);
        said.filter(|_| self.voice_enabled)
    }

    fn blend_look(&mut self, state: &HandState) {
        let (tint, intensity) = material_target(Formation::select(state));
        let l = &mut self.look;
        l.tint = l.tint.lerp(tint, PRESENTATION_BLEND);
        l.emissive = l.emissive.lerp(tint, PRESENTATION_BLEND);
        l.emissive_intensity += (intensity - l.emissive_intensity) * PRESENTATION_BLEND;
        l.bloom += (bloom_target(state) - l.bloom) * PRESENTATION_BLEND;
    }

    // Edge memory is tracked even while voice is locked so that unlocking
    // mid-gesture does not replay a sustained state.
    fn detect_edges(&mut self, state: &HandState) -> Option<Announcement> {
        let mut said = None;
        let love = state.love_mode;
        if love == LoveMode::Single && self.was_love != LoveMode::Single {
            said = Some(Announcement::new(PHRASE_LOVE_SINGLE));
        }
        if love == LoveMode::Double && self.was_love != LoveMode::Double {
            said = Some(Announcement::new(PHRASE_LOVE_DOUBLE));
        }
        self.was_love = love;

        if state.is_triangle && !self.was_triangle {
            said = Some(Announcement::new(PHRASE_PYRAMID));
        }
        self.was_triangle = state.is_triangle;

        if state.is_pinch && !self.was_pinch && !state.is_triangle && !love.is_active() {
            said = Some(Announcement::new(PHRASE_PINCH));
        }
        self.was_pinch = state.is_pinch;

        let counting = Formation::glyph_eligible(state) && !state.is_pinch;
        if counting && self.last_finger_count != Some(state.finger_count) {
            if state.finger_count > 0 {
                said = Some(Announcement::new(state.finger_count.to_string()));
            }
            self.last_finger_count = Some(state.finger_count);
        }
        said
    }
}
