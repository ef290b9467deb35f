//! Hand landmark model as delivered by the external hand-tracking engine.
//!
//! Each detected hand is a fixed sequence of 21 points with x/y normalized to
//! the capture frame (origin top-left, y grows downward) and z a relative
//! depth. Frames carry zero, one or two hands in the engine's order; the
//! first hand is the primary one.

use crate::constants::{LANDMARKS_PER_HAND, MAX_HANDS};
use crate::error::{Result, SwarmError};
use glam::Vec2;
use smallvec::SmallVec;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// (tip, proximal joint) pairs for the four non-thumb fingers.
pub const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Planar distance in normalized image units; depth is ignored.
    #[inline]
    pub fn distance_xy(&self, other: &Landmark) -> f32 {
        self.xy().distance(other.xy())
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hand {
    pub points: [Landmark; LANDMARKS_PER_HAND],
}

impl Hand {
    pub fn new(points: [Landmark; LANDMARKS_PER_HAND]) -> Self {
        Self { points }
    }

    #[inline]
    pub fn point(&self, index: usize) -> &Landmark {
        &self.points[index]
    }

    fn validate(&self, hand: usize) -> Result<()> {
        match self.points.iter().position(|p| !p.is_finite()) {
            Some(index) => Err(SwarmError::NonFinite { hand, index }),
            None => Ok(()),
        }
    }
}

/// One frame of detector output: up to two validated hands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandFrame {
    hands: SmallVec<[Hand; MAX_HANDS]>,
}

impl HandFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(hands: impl IntoIterator<Item = Hand>) -> Result<Self> {
        let hands: SmallVec<[Hand; MAX_HANDS]> = hands.into_iter().collect();
        if hands.len() > MAX_HANDS {
            return Err(SwarmError::TooManyHands(hands.len()));
        }
        for (i, h) in hands.iter().enumerate() {
            h.validate(i)?;
        }
        Ok(Self { hands })
    }

    /// Build a frame from per-hand point lists of arbitrary length, rejecting
    /// any hand whose shape does not match the 21-point layout.
    pub fn from_points(hands: &[Vec<Landmark>]) -> Result<Self> {
        if hands.len() > MAX_HANDS {
            return Err(SwarmError::TooManyHands(hands.len()));
        }
        let mut out = SmallVec::<[Hand; MAX_HANDS]>::new();
        for (i, pts) in hands.iter().enumerate() {
            let points: [Landmark; LANDMARKS_PER_HAND] =
                pts.as_slice()
                    .try_into()
                    .map_err(|_| SwarmError::LandmarkCount {
                        hand: i,
                        got: pts.len(),
                        expected: LANDMARKS_PER_HAND,
                    })?;
            out.push(Hand::new(points));
        }
        Self::new(out)
    }

    /// Build a frame from a flat `[x, y, z, x, y, z, ...]` buffer holding
    /// `num_hands` consecutive hands.
    pub fn from_flat(flat: &[f32], num_hands: usize) -> Result<Self> {
        if num_hands > MAX_HANDS {
            return Err(SwarmError::TooManyHands(num_hands));
        }
        let stride = LANDMARKS_PER_HAND * 3;
        let mut out = SmallVec::<[Hand; MAX_HANDS]>::new();
        for h in 0..num_hands {
            let chunk = flat.get(h * stride..(h + 1) * stride).ok_or_else(|| {
                SwarmError::LandmarkCount {
                    hand: h,
                    got: flat.len().saturating_sub(h * stride) / 3,
                    expected: LANDMARKS_PER_HAND,
                }
            })?;
            let mut points = [Landmark::default(); LANDMARKS_PER_HAND];
            for (p, xyz) in points.iter_mut().zip(chunk.chunks_exact(3)) {
                *p = Landmark::new(xyz[0], xyz[1], xyz[2]);
            }
            out.push(Hand::new(points));
        }
        Self::new(out)
    }

    #[inline]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    #[inline]
    pub fn primary(&self) -> Option<&Hand> {
        self.hands.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_buffer_with_short_second_hand_is_rejected() {
        let flat = vec![0.5; LANDMARKS_PER_HAND * 3 + 10];
        let err = HandFrame::from_flat(&flat, 2).unwrap_err();
        assert!(matches!(err, SwarmError::LandmarkCount { hand: 1, .. }));
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let mut flat = vec![0.5; LANDMARKS_PER_HAND * 3];
        flat[7] = f32::NAN;
        let err = HandFrame::from_flat(&flat, 1).unwrap_err();
        assert_eq!(err, SwarmError::NonFinite { hand: 0, index: 2 });
    }

    #[test]
    fn three_hands_are_rejected() {
        let flat = vec![0.5; LANDMARKS_PER_HAND * 9];
        assert_eq!(
            HandFrame::from_flat(&flat, 3).unwrap_err(),
            SwarmError::TooManyHands(3)
        );
    }
}
