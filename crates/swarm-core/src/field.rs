//! Particle field simulation.
//!
//! A fixed set of particles, allocated once, is pulled every tick toward the
//! active formation. Positions and scales are never set directly: each tick
//! moves them a formation-specific fraction of the way to their target, so
//! gesture changes read as a flow rather than a jump.

use crate::camera::{capture_aspect, hand_to_world, Viewport};
use crate::constants::*;
use crate::formation::{self, Anchor, Formation};
use crate::gesture::{HandState, LoveMode};
use crate::glyph::{GlyphRasterizer, GlyphTargets};
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use rand::prelude::*;

#[derive(Clone, Debug)]
pub struct FieldParams {
    pub count: usize,
    pub seed: u64,
    /// Width / height of the capture frame the hand coordinates refer to.
    pub capture_aspect: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            seed: DEFAULT_SEED,
            capture_aspect: capture_aspect(),
        }
    }
}

/// Per-instance data handed to the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

#[derive(Clone, Debug)]
pub struct Particle {
    // Precomputed offsets relative to the formation center.
    pub scatter: Vec3,
    pub sphere: Vec3,
    pub pyramid: Vec3,
    pub heart: Vec3,
    /// Euler angular velocity (rad per tick) used while not facing a center.
    pub spin: Vec3,
    pub base_scale: f32,
    pub color: Vec3,

    position: Vec3,
    euler: Vec3,
    orientation: Quat,
    scale: f32,
}

impl Particle {
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// World transform: uniform scale, then rotation, then translation.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orientation, self.position)
    }

    fn generate<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> Self {
        let scatter = formation::scatter_offset(rng);
        let sphere = formation::sphere_point(i, count, SPHERE_RADIUS);
        let pyramid = formation::pyramid_point(i, rng);
        let heart = formation::heart_point(i, count, rng);
        let euler = Vec3::new(
            rng.gen::<f32>() * std::f32::consts::PI,
            rng.gen::<f32>() * std::f32::consts::PI,
            rng.gen::<f32>() * std::f32::consts::PI,
        );
        let spin = Vec3::new(
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
        ) * SPIN_SPEED_SPAN;
        let color = Vec3::from_array(
            *PARTICLE_PALETTE
                .choose(rng)
                .unwrap_or(&PARTICLE_PALETTE[0]),
        );
        let base_scale = BASE_SCALE_MIN + rng.gen::<f32>() * BASE_SCALE_SPAN;
        Self {
            scatter,
            sphere,
            pyramid,
            heart,
            spin,
            base_scale,
            color,
            position: scatter,
            euler,
            orientation: euler_quat(euler),
            scale: 0.0,
        }
    }
}

#[inline]
fn euler_quat(e: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, e.x, e.y, e.z)
}

/// Rotation that turns local +Z toward `target`, keeping +Y as close to
/// world up as possible.
pub fn facing(from: Vec3, target: Vec3) -> Quat {
    let forward = (target - from).normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let right = up.cross(forward).normalize();
    let true_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, forward))
}

/// Blend `value` a `rate` fraction of the way toward `target`.
#[inline]
pub fn approach(value: f32, target: f32, rate: f32) -> f32 {
    value + (target - value) * rate
}

pub struct ParticleField {
    params: FieldParams,
    particles: Vec<Particle>,
    glyph: GlyphTargets,
    rng: StdRng,
    active: Formation,
    center: Vec3,
}

impl ParticleField {
    pub fn new(params: FieldParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let count = params.count;
        let particles = (0..count)
            .map(|i| Particle::generate(i, count, &mut rng))
            .collect();
        log::info!("[field] {} particles, seed {}", count, params.seed);
        Self {
            glyph: GlyphTargets::new(count),
            params,
            particles,
            rng,
            active: Formation::Scatter,
            center: Vec3::ZERO,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn active(&self) -> Formation {
        self.active
    }

    /// Formation center used on the last tick.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn glyph(&self) -> &GlyphTargets {
        &self.glyph
    }

    /// Advance one tick. `time_sec` is the elapsed animation time driving the
    /// pulse, spin and wave terms. Without a published hand state the tick is
    /// skipped and every particle holds its place.
    pub fn tick(
        &mut self,
        hand: Option<&HandState>,
        time_sec: f32,
        viewport: &Viewport,
        rasterizer: &mut dyn GlyphRasterizer,
    ) -> Option<Formation> {
        let state = hand?;
        let formation = Formation::select(state);
        if formation != self.active {
            log::debug!("[field] {:?} -> {:?}", self.active, formation);
        }
        self.active = formation;

        if formation == Formation::Glyph {
            self.glyph
                .ensure(state.finger_count, rasterizer, &mut self.rng);
        }

        let hand_world = hand_to_world(state.position, viewport, self.params.capture_aspect);
        self.center = match formation.anchor(state) {
            Anchor::Hand => hand_world,
            Anchor::Origin => Vec3::ZERO,
        };

        let center = self.center;
        let rate = formation.blend_rate();
        let size = formation.particle_size();
        let faces_center = formation.faces_center();
        let pulse = 1.0 + (time_sec * HEART_PULSE_FREQ).sin() * HEART_PULSE_AMOUNT;
        let heart_scale = if state.love_mode == LoveMode::Single {
            HEART_SINGLE_SCALE
        } else {
            1.0
        };
        let (spin_sin, spin_cos) = (time_sec * PYRAMID_SPIN_RATE).sin_cos();
        let glyph = self.glyph.targets();

        for (i, p) in self.particles.iter_mut().enumerate() {
            p.euler += p.spin;
            let offset = match formation {
                Formation::Heart => Vec3::new(
                    p.heart.x * pulse * heart_scale,
                    p.heart.y * pulse * heart_scale,
                    p.heart.z * heart_scale,
                ),
                Formation::Pyramid => Vec3::new(
                    p.pyramid.x * spin_cos - p.pyramid.z * spin_sin,
                    p.pyramid.y,
                    p.pyramid.x * spin_sin + p.pyramid.z * spin_cos,
                ),
                Formation::Sphere => p.sphere * SPHERE_DENSITY,
                Formation::Glyph => glyph[i],
                Formation::Scatter => {
                    let wave_x = (time_sec * SCATTER_WAVE_FREQ[0] + p.scatter.y).sin()
                        * SCATTER_WAVE_AMPLITUDE;
                    let wave_y = (time_sec * SCATTER_WAVE_FREQ[1] + p.scatter.x).cos()
                        * SCATTER_WAVE_AMPLITUDE;
                    p.scatter + Vec3::new(wave_x, wave_y, 0.0)
                }
            };
            let target = center + offset;
            p.position += (target - p.position) * rate;
            p.orientation = if faces_center {
                facing(p.position, center)
            } else {
                euler_quat(p.euler)
            };
            p.scale = approach(p.scale, size * p.base_scale, SCALE_BLEND);
        }
        Some(formation)
    }

    /// Pack every particle's transform and color for instanced drawing.
    pub fn write_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.clear();
        out.extend(self.particles.iter().map(|p| ParticleInstance {
            model: p.transform().to_cols_array_2d(),
            color: p.color.extend(1.0).to_array(),
        }));
    }
}
