// Synthetic hand poses for host-side tests.

#![allow(dead_code)]

use glam::Vec2;
use swarm_core::constants::LANDMARKS_PER_HAND;
use swarm_core::landmarks::*;
use swarm_core::{Hand, HandFrame, HandState};

/// Describes a hand by the features the classifier looks at; `build` lays
/// out the 21 landmarks so that exactly those features hold.
#[derive(Clone, Copy, Debug)]
pub struct HandSpec {
    anchor: Vec2,
    grip_dist: f32,
    fingers: u8,
    thumb_out: bool,
    index_tip: Vec2,
    thumb_tip: Vec2,
}

impl HandSpec {
    /// Open-ish relaxed hand with its middle-finger base at (x, y): grip
    /// 0.25, no extended fingers, thumb and index well apart.
    pub fn at(x: f32, y: f32) -> Self {
        let anchor = Vec2::new(x, y);
        Self {
            anchor,
            grip_dist: 0.30,
            fingers: 0,
            thumb_out: false,
            index_tip: anchor + Vec2::new(0.0, -0.15),
            thumb_tip: anchor + Vec2::new(0.06, -0.02),
        }
    }

    pub fn grip_distance(mut self, d: f32) -> Self {
        self.grip_dist = d;
        self
    }

    /// Extend `n` of the four long fingers (index first).
    pub fn fingers(mut self, n: u8) -> Self {
        self.fingers = n.min(4);
        self
    }

    pub fn thumb_out(mut self) -> Self {
        self.thumb_out = true;
        self
    }

    pub fn index_tip(mut self, x: f32, y: f32) -> Self {
        self.index_tip = Vec2::new(x, y);
        self
    }

    pub fn thumb_tip(mut self, x: f32, y: f32) -> Self {
        self.thumb_tip = Vec2::new(x, y);
        self
    }

    /// Put the thumb tip `d` to the right of the index tip.
    pub fn thumb_index(mut self, d: f32) -> Self {
        self.thumb_tip = self.index_tip + Vec2::new(d, 0.0);
        self
    }

    pub fn build(&self) -> Hand {
        let a = self.anchor;
        let mut p = [Landmark::new(a.x, a.y, 0.0); LANDMARKS_PER_HAND];
        let set = |p: &mut [Landmark; LANDMARKS_PER_HAND], i: usize, v: Vec2| {
            p[i] = Landmark::new(v.x, v.y, 0.0);
        };

        let wrist = a + Vec2::new(0.0, 0.1);
        set(&mut p, WRIST, wrist);
        set(&mut p, MIDDLE_MCP, a);
        set(&mut p, MIDDLE_TIP, wrist - Vec2::new(0.0, self.grip_dist));
        set(&mut p, INDEX_TIP, self.index_tip);
        set(&mut p, THUMB_TIP, self.thumb_tip);
        set(&mut p, RING_TIP, a + Vec2::new(0.02, -0.10));
        set(&mut p, PINKY_TIP, a + Vec2::new(0.04, -0.08));

        // Proximal joints go above or below their tips to fix the count.
        for (k, (tip, pip)) in FINGER_JOINTS.iter().enumerate() {
            let t = p[*tip];
            let dy = if (k as u8) < self.fingers { 0.03 } else { -0.03 };
            p[*pip] = Landmark::new(t.x, t.y + dy, 0.0);
        }

        let pinky_base = Vec2::new(a.x - 0.1, a.y);
        set(&mut p, PINKY_MCP, pinky_base);
        let reach = self.thumb_tip.x - pinky_base.x;
        let ip_x = pinky_base.x + reach * if self.thumb_out { 0.5 } else { 2.0 };
        set(&mut p, THUMB_IP, Vec2::new(ip_x, self.thumb_tip.y));

        Hand::new(p)
    }
}

pub fn frame(hands: &[HandSpec]) -> HandFrame {
    HandFrame::new(hands.iter().map(HandSpec::build)).expect("valid synthetic frame")
}

pub fn state() -> HandState {
    HandState::default()
}
