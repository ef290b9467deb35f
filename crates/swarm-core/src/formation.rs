//! Formation selection and the static per-particle target generators.
//!
//! All generators return offsets relative to the formation center; the field
//! adds the dynamic center (hand anchor or screen origin) every tick.

use crate::constants::*;
use crate::gesture::{HandState, LoveMode};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Formation {
    Scatter,
    Sphere,
    Pyramid,
    Heart,
    Glyph,
}

/// Where a formation is centered for the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Hand,
    Origin,
}

type Rule = (Formation, fn(&HandState) -> bool);

fn love_active(s: &HandState) -> bool {
    s.love_mode.is_active()
}

fn triangle(s: &HandState) -> bool {
    s.is_triangle
}

fn fist(s: &HandState) -> bool {
    s.grip > SPHERE_GRIP_MIN
}

fn counting(s: &HandState) -> bool {
    s.finger_count > 0 && s.grip < GLYPH_GRIP_MAX
}

fn always(_: &HandState) -> bool {
    true
}

/// Active-formation rules, highest priority first. The first matching rule
/// wins; scatter is the catch-all.
pub const PRIORITY: [Rule; 5] = [
    (Formation::Heart, love_active),
    (Formation::Pyramid, triangle),
    (Formation::Sphere, fist),
    (Formation::Glyph, counting),
    (Formation::Scatter, always),
];

impl Formation {
    pub fn select(state: &HandState) -> Formation {
        PRIORITY
            .iter()
            .find(|(_, applies)| applies(state))
            .map(|(f, _)| *f)
            .unwrap_or(Formation::Scatter)
    }

    pub fn anchor(self, state: &HandState) -> Anchor {
        match self {
            Formation::Pyramid => Anchor::Origin,
            Formation::Heart if state.love_mode == LoveMode::Double => Anchor::Origin,
            _ => Anchor::Hand,
        }
    }

    pub fn blend_rate(self) -> f32 {
        match self {
            Formation::Heart => HEART_BLEND,
            Formation::Pyramid => PYRAMID_BLEND,
            Formation::Sphere => SPHERE_BLEND,
            Formation::Glyph => GLYPH_BLEND,
            Formation::Scatter => SCATTER_BLEND,
        }
    }

    /// Visual size multiplier before the particle's own base scale.
    pub fn particle_size(self) -> f32 {
        match self {
            Formation::Heart => HEART_SIZE,
            Formation::Pyramid => PYRAMID_SIZE,
            Formation::Sphere => SPHERE_SIZE,
            Formation::Glyph => GLYPH_SIZE,
            Formation::Scatter => SCATTER_SIZE,
        }
    }

    /// Centered formations turn every particle to face the center.
    pub fn faces_center(self) -> bool {
        matches!(
            self,
            Formation::Heart | Formation::Pyramid | Formation::Sphere
        )
    }

    /// Glyph formation is allowed to (re)target its digit: no centered
    /// two-hand gesture and an open enough hand.
    pub fn glyph_eligible(state: &HandState) -> bool {
        !state.is_triangle && !state.love_mode.is_active() && state.grip < GLYPH_GRIP_MAX
    }
}

/// Uniform random offset inside the idle scatter box.
pub fn scatter_offset<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * SCATTER_EXTENT[0],
        (rng.gen::<f32>() - 0.5) * SCATTER_EXTENT[1],
        (rng.gen::<f32>() - 0.5) * SCATTER_EXTENT[2],
    )
}

/// Golden-spiral point `i` of `count` on a sphere of `radius`.
pub fn sphere_point(i: usize, count: usize, radius: f32) -> Vec3 {
    let n = count.max(1) as f32;
    let phi = (-1.0 + (2.0 * i as f32) / n).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

pub fn pyramid_vertices() -> [Vec3; 4] {
    [
        Vec3::from_array(PYRAMID_APEX),
        Vec3::from_array(PYRAMID_BASE[0]),
        Vec3::from_array(PYRAMID_BASE[1]),
        Vec3::from_array(PYRAMID_BASE[2]),
    ]
}

/// The six tetrahedron edges as (start, end) vertex indices.
pub const PYRAMID_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (2, 3), (3, 1)];

/// Particle `i` sits at a random point on edge `i mod 6`, plus jitter.
pub fn pyramid_point<R: Rng + ?Sized>(i: usize, rng: &mut R) -> Vec3 {
    let v = pyramid_vertices();
    let (a, b) = PYRAMID_EDGES[i % PYRAMID_EDGES.len()];
    let on_edge = v[a].lerp(v[b], rng.gen::<f32>());
    let jitter = Vec3::new(
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
    ) * PYRAMID_JITTER;
    on_edge + jitter
}

/// Heart curve sample in curve units (before scaling).
pub fn heart_curve(t: f32) -> (f32, f32) {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    (x, y)
}

/// Particle `i` of `count` along the heart curve, with random depth.
pub fn heart_point<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> Vec3 {
    let t = TAU * i as f32 / count.max(1) as f32;
    let (x, y) = heart_curve(t);
    let depth = (rng.gen::<f32>() - 0.5) * HEART_THICKNESS;
    Vec3::new(x * HEART_SCALE, y * HEART_SCALE, depth)
}
