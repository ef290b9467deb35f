//! Gesture classification: one frame of landmarks in, one `HandState` out.
//!
//! Every detected hand is evaluated independently (extended fingers, grip,
//! finger-heart, pinch) and the two-hand gestures are layered on top when
//! exactly two hands are present. The only state carried between frames is
//! the exponentially smoothed anchor position.

use crate::constants::*;
use crate::landmarks::*;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoveMode {
    #[default]
    None,
    Single,
    Double,
}

impl LoveMode {
    #[inline]
    pub fn is_active(self) -> bool {
        self != LoveMode::None
    }
}

/// Snapshot of the most recently classified gesture signals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandState {
    /// Smoothed anchor in normalized capture coordinates.
    pub position: Vec2,
    /// Closed-fist amount in [0, 1], max over all hands.
    pub grip: f32,
    /// Extended fingers on the primary hand, 0..=5.
    pub finger_count: u8,
    pub is_triangle: bool,
    pub love_mode: LoveMode,
    pub is_pinch: bool,
    /// Landmarks of the anchoring hand, empty when no hand qualifies.
    pub active_landmarks: Vec<Landmark>,
}

impl HandState {
    /// Neutral state with the anchor at a given position.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Map the middle-fingertip to wrist distance onto a grip amount.
pub fn grip_from_distance(dist: f32) -> f32 {
    if dist <= GRIP_CLOSED_DIST {
        1.0
    } else if dist >= GRIP_OPEN_DIST {
        0.0
    } else {
        1.0 - (dist - GRIP_CLOSED_DIST) / (GRIP_OPEN_DIST - GRIP_CLOSED_DIST)
    }
}

pub fn grip_amount(hand: &Hand) -> f32 {
    grip_from_distance(hand.point(MIDDLE_TIP).distance_xy(hand.point(WRIST)))
}

/// Count extended digits: a finger is up when its tip is above its proximal
/// joint; the thumb is out when its tip sits further (horizontally) from the
/// pinky base than its IP joint does.
pub fn extended_fingers(hand: &Hand) -> u8 {
    let fingers = FINGER_JOINTS
        .iter()
        .filter(|(tip, pip)| hand.point(*tip).y < hand.point(*pip).y)
        .count() as u8;
    let pinky_base = hand.point(PINKY_MCP).x;
    let thumb_out =
        (hand.point(THUMB_TIP).x - pinky_base).abs() > (hand.point(THUMB_IP).x - pinky_base).abs();
    fingers + u8::from(thumb_out)
}

#[inline]
fn thumb_index_distance(hand: &Hand) -> f32 {
    hand.point(THUMB_TIP).distance_xy(hand.point(INDEX_TIP))
}

pub fn is_finger_heart(hand: &Hand) -> bool {
    thumb_index_distance(hand) < LOVE_SINGLE_DIST
}

pub fn is_pinching(hand: &Hand) -> bool {
    thumb_index_distance(hand) < PINCH_DIST
}

/// Result of the two-hand pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwoHandGesture {
    DoubleHeart,
    Triangle,
}

/// Double heart when both index tips and both thumb tips meet; triangle when
/// the index tips meet but the thumbs are held apart. The thumb thresholds
/// do not overlap, so at most one of the two can fire.
pub fn two_hand_gesture(first: &Hand, second: &Hand) -> Option<TwoHandGesture> {
    let dist_index = first.point(INDEX_TIP).distance_xy(second.point(INDEX_TIP));
    let dist_thumb = first.point(THUMB_TIP).distance_xy(second.point(THUMB_TIP));
    if dist_index >= TWO_HAND_INDEX_DIST {
        return None;
    }
    if dist_thumb < LOVE_DOUBLE_THUMB_DIST {
        Some(TwoHandGesture::DoubleHeart)
    } else if dist_thumb > TRIANGLE_THUMB_DIST {
        Some(TwoHandGesture::Triangle)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GestureClassifier;

impl GestureClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one frame. `previous` supplies the anchor position to smooth
    /// from; everything else is recomputed from the raw geometry.
    pub fn classify(&self, frame: &HandFrame, previous: &HandState) -> HandState {
        let mut state = HandState::at(previous.position);
        let Some(primary) = frame.primary() else {
            return state;
        };

        for hand in frame.hands() {
            state.grip = state.grip.max(grip_amount(hand));
            if is_finger_heart(hand) {
                state.love_mode = LoveMode::Single;
            }
        }
        state.finger_count = extended_fingers(primary);
        state.is_pinch = is_pinching(primary);

        if let [first, second] = frame.hands() {
            match two_hand_gesture(first, second) {
                Some(TwoHandGesture::DoubleHeart) => state.love_mode = LoveMode::Double,
                Some(TwoHandGesture::Triangle) => state.is_triangle = true,
                None => {}
            }
        }

        state.active_landmarks = primary.points.to_vec();
        // Centered two-hand formations ignore the anchor; hold it steady so
        // the swarm resumes where the hand was once the gesture ends.
        if !state.is_triangle && state.love_mode != LoveMode::Double {
            let target = primary.point(MIDDLE_MCP).xy();
            state.position += (target - state.position) * POSITION_SMOOTHING;
        }
        state
    }
}

/// Process-wide `HandState` cell: the classifier callback replaces the whole
/// value, the frame loop reads it. Both run on the same thread.
#[derive(Clone, Debug, Default)]
pub struct SharedHandState {
    inner: Rc<RefCell<Option<HandState>>>,
}

impl SharedHandState {
    /// Uninitialized cell; readers see `None` until the first publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell holding the neutral startup state.
    pub fn neutral() -> Self {
        let s = Self::new();
        s.publish(HandState::default());
        s
    }

    pub fn publish(&self, state: HandState) {
        *self.inner.borrow_mut() = Some(state);
    }

    pub fn snapshot(&self) -> Option<HandState> {
        self.inner.borrow().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Classify `frame` against the current state and publish the result.
    pub fn apply(&self, classifier: &GestureClassifier, frame: &HandFrame) -> HandState {
        let previous = self.snapshot().unwrap_or_default();
        let next = classifier.classify(frame, &previous);
        if next.love_mode != previous.love_mode || next.is_triangle != previous.is_triangle {
            log::debug!(
                "[gesture] love={:?} triangle={} grip={:.2} fingers={}",
                next.love_mode,
                next.is_triangle,
                next.grip,
                next.finger_count
            );
        }
        self.publish(next.clone());
        next
    }
}
