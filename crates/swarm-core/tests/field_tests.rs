use glam::{Vec2, Vec3};
use swarm_core::constants::*;
use swarm_core::{
    hand_to_world, BitmapFont, Camera, FieldParams, Formation, GlyphBitmap, GlyphRasterizer,
    HandState, LoveMode, ParticleField, ParticleInstance, Viewport,
};

const COUNT: usize = 64;

fn field() -> ParticleField {
    ParticleField::new(FieldParams {
        count: COUNT,
        ..Default::default()
    })
}

fn viewport() -> Viewport {
    Camera::looking_at_origin(12.0, 50f32.to_radians(), 16.0 / 9.0).viewport()
}

fn fist_at_center() -> HandState {
    HandState {
        grip: 0.9,
        ..HandState::at(Vec2::new(0.5, 0.5))
    }
}

fn counting(n: u8) -> HandState {
    HandState {
        grip: 0.2,
        finger_count: n,
        ..HandState::at(Vec2::new(0.5, 0.5))
    }
}

fn positions(f: &ParticleField) -> Vec<Vec3> {
    f.particles().iter().map(|p| p.position()).collect()
}

#[test]
fn camera_viewport_matches_fov() {
    let vp = viewport();
    assert!((vp.height - 11.19).abs() < 0.01);
    assert!((vp.width - vp.height * 16.0 / 9.0).abs() < 1e-4);
}

#[test]
fn hand_mapping_mirrors_and_stretches_cropped_axis() {
    let vp = Viewport::new(16.0, 9.0);
    let aspect = 4.0 / 3.0;
    assert_eq!(hand_to_world(Vec2::new(0.5, 0.5), &vp, aspect), Vec3::ZERO);

    let left_edge = hand_to_world(Vec2::new(0.0, 0.5), &vp, aspect);
    assert!((left_edge.x - 8.0).abs() < 1e-5);

    // Screen is wider than the capture, so the capture's top and bottom
    // are cropped and y reaches past the viewport edge.
    let top = hand_to_world(Vec2::new(0.5, 0.0), &vp, aspect);
    let scale = (16.0 / 9.0) / aspect;
    assert!((top.y - 4.5 * scale).abs() < 1e-4);
    assert_eq!(top.z, 0.0);
}

#[test]
fn hand_mapping_on_narrow_screen_stretches_x() {
    let vp = Viewport::new(9.0, 16.0);
    let aspect = 4.0 / 3.0;
    let right = hand_to_world(Vec2::new(0.0, 0.5), &vp, aspect);
    let scale = aspect / (9.0 / 16.0);
    assert!((right.x - 4.5 * scale).abs() < 1e-4);
    let bottom = hand_to_world(Vec2::new(0.5, 1.0), &vp, aspect);
    assert!((bottom.y + 8.0).abs() < 1e-5);
}

#[test]
fn starts_scattered_and_invisible() {
    let f = field();
    assert_eq!(f.len(), COUNT);
    assert_eq!(f.active(), Formation::Scatter);
    for p in f.particles() {
        assert_eq!(p.position(), p.scatter);
        assert_eq!(p.scale(), 0.0);
    }
}

#[test]
fn tick_without_hand_state_is_a_no_op() {
    let mut f = field();
    let before = positions(&f);
    for t in 0..10 {
        assert_eq!(f.tick(None, t as f32 * 0.016, &viewport(), &mut BitmapFont), None);
    }
    assert_eq!(positions(&f), before);
    assert!(f.particles().iter().all(|p| p.scale() == 0.0));
}

#[test]
fn love_beats_triangle_and_fist() {
    let mut f = field();
    let s = HandState {
        love_mode: LoveMode::Single,
        is_triangle: true,
        grip: 0.9,
        ..Default::default()
    };
    assert_eq!(
        f.tick(Some(&s), 0.0, &viewport(), &mut BitmapFont),
        Some(Formation::Heart)
    );
    assert_eq!(f.active(), Formation::Heart);
}

#[test]
fn sphere_converges_geometrically() {
    let mut f = field();
    let s = fist_at_center();
    let vp = viewport();
    let targets: Vec<Vec3> = f
        .particles()
        .iter()
        .map(|p| p.sphere * SPHERE_DENSITY)
        .collect();
    let mut errors: Vec<f32> = positions(&f)
        .iter()
        .zip(&targets)
        .map(|(p, t)| p.distance(*t))
        .collect();
    for step in 0..20 {
        f.tick(Some(&s), step as f32 * 0.016, &vp, &mut BitmapFont);
        assert_eq!(f.center(), Vec3::ZERO);
        for (i, p) in f.particles().iter().enumerate() {
            let e = p.position().distance(targets[i]);
            let expected = errors[i] * (1.0 - SPHERE_BLEND);
            assert!((e - expected).abs() < 1e-3, "particle {i} step {step}");
            errors[i] = e;
        }
    }
}

#[test]
fn converged_sphere_stays_put() {
    let mut f = field();
    let s = fist_at_center();
    let vp = viewport();
    for step in 0..300 {
        f.tick(Some(&s), step as f32 * 0.016, &vp, &mut BitmapFont);
    }
    let settled = positions(&f);
    f.tick(Some(&s), 5.0, &vp, &mut BitmapFont);
    for (a, b) in settled.iter().zip(positions(&f)) {
        assert!(a.distance(b) < 1e-5);
    }
    for p in f.particles() {
        assert!((p.scale() - SPHERE_SIZE * p.base_scale).abs() < 1e-4);
    }
}

#[test]
fn scale_moves_a_tenth_of_the_way_per_tick() {
    let mut f = field();
    f.tick(Some(&fist_at_center()), 0.0, &viewport(), &mut BitmapFont);
    for p in f.particles() {
        let expected = SCALE_BLEND * SPHERE_SIZE * p.base_scale;
        assert!((p.scale() - expected).abs() < 1e-6);
    }
}

#[test]
fn centered_formations_face_the_center() {
    let mut f = field();
    let s = fist_at_center();
    f.tick(Some(&s), 0.0, &viewport(), &mut BitmapFont);
    let c = f.center();
    for p in f.particles() {
        let to_center = (c - p.position()).normalize();
        let forward = p.orientation() * Vec3::Z;
        assert!(forward.dot(to_center) > 0.999);
    }
}

#[test]
fn pyramid_and_double_heart_center_on_origin() {
    let vp = viewport();
    let off_center = Vec2::new(0.2, 0.3);

    let mut f = field();
    let tri = HandState {
        is_triangle: true,
        ..HandState::at(off_center)
    };
    f.tick(Some(&tri), 0.0, &vp, &mut BitmapFont);
    assert_eq!(f.active(), Formation::Pyramid);
    assert_eq!(f.center(), Vec3::ZERO);

    let double = HandState {
        love_mode: LoveMode::Double,
        ..HandState::at(off_center)
    };
    f.tick(Some(&double), 0.0, &vp, &mut BitmapFont);
    assert_eq!(f.center(), Vec3::ZERO);

    let single = HandState {
        love_mode: LoveMode::Single,
        ..HandState::at(off_center)
    };
    f.tick(Some(&single), 0.0, &vp, &mut BitmapFont);
    let expected = hand_to_world(off_center, &vp, FieldParams::default().capture_aspect);
    assert!(f.center().distance(expected) < 1e-5);
    assert_ne!(f.center(), Vec3::ZERO);
}

#[test]
fn glyph_regenerates_once_per_digit_change() {
    let mut f = field();
    let vp = viewport();
    let mut font = BitmapFont;
    for t in 0..5 {
        f.tick(Some(&counting(3)), t as f32, &vp, &mut font);
    }
    assert_eq!(f.active(), Formation::Glyph);
    assert_eq!(f.glyph().digit(), Some(3));
    assert_eq!(f.glyph().regenerations(), 1);

    for t in 5..15 {
        f.tick(Some(&counting(5)), t as f32, &vp, &mut font);
    }
    assert_eq!(f.glyph().digit(), Some(5));
    assert_eq!(f.glyph().regenerations(), 2);
}

#[test]
fn glyph_cache_is_untouched_outside_glyph_formation() {
    let mut f = field();
    let vp = viewport();
    f.tick(Some(&counting(2)), 0.0, &vp, &mut BitmapFont);
    // Fist with fingers up is a sphere; the cached digit stays.
    let fist = HandState {
        finger_count: 4,
        ..fist_at_center()
    };
    for t in 0..5 {
        f.tick(Some(&fist), t as f32, &vp, &mut BitmapFont);
    }
    assert_eq!(f.glyph().digit(), Some(2));
    assert_eq!(f.glyph().regenerations(), 1);
}

#[test]
fn glyph_targets_follow_the_hand() {
    let mut f = field();
    let vp = viewport();
    let s = counting(1);
    for t in 0..200 {
        f.tick(Some(&s), t as f32, &vp, &mut BitmapFont);
    }
    let c = f.center();
    for (p, t) in f.particles().iter().zip(f.glyph().targets()) {
        assert!(p.position().distance(c + *t) < 1e-3);
    }
}

#[test]
fn instances_cover_every_particle() {
    let mut f = field();
    f.tick(Some(&fist_at_center()), 0.0, &viewport(), &mut BitmapFont);
    let mut out: Vec<ParticleInstance> = Vec::new();
    f.write_instances(&mut out);
    assert_eq!(out.len(), COUNT);
    f.write_instances(&mut out);
    assert_eq!(out.len(), COUNT);
    let p = &f.particles()[0];
    assert_eq!(out[0].model[3][0], p.position().x);
    assert_eq!(out[0].color[3], 1.0);
}

#[test]
fn same_seed_same_field() {
    let a = field();
    let b = field();
    assert_eq!(positions(&a), positions(&b));
}

fn assert_near(actual: Vec3, expected: Vec3, tol: f32) {
    assert!(
        actual.distance(expected) < tol,
        "{actual:?} vs {expected:?}"
    );
}

#[test]
fn single_heart_pulses_at_half_size_around_the_hand() {
    let vp = viewport();
    let hand = Vec2::new(0.3, 0.6);
    let s = HandState {
        love_mode: LoveMode::Single,
        ..HandState::at(hand)
    };
    let t = 0.2;
    let mut f = field();
    let start = positions(&f);
    f.tick(Some(&s), t, &vp, &mut BitmapFont);

    let center = hand_to_world(hand, &vp, FieldParams::default().capture_aspect);
    let pulse = 1.0 + (t * HEART_PULSE_FREQ).sin() * HEART_PULSE_AMOUNT;
    for (p, b) in f.particles().iter().zip(start) {
        let h = p.heart;
        let offset = Vec3::new(h.x * pulse, h.y * pulse, h.z) * HEART_SINGLE_SCALE;
        let expected = b + (center + offset - b) * HEART_BLEND;
        assert_near(p.position(), expected, 1e-4);
    }
}

#[test]
fn double_heart_pulses_at_full_size_around_the_origin() {
    let s = HandState {
        love_mode: LoveMode::Double,
        ..HandState::at(Vec2::new(0.2, 0.3))
    };
    let t = 1.3;
    let mut f = field();
    let start = positions(&f);
    f.tick(Some(&s), t, &viewport(), &mut BitmapFont);

    let pulse = 1.0 + (t * HEART_PULSE_FREQ).sin() * HEART_PULSE_AMOUNT;
    for (p, b) in f.particles().iter().zip(start) {
        let h = p.heart;
        let offset = Vec3::new(h.x * pulse, h.y * pulse, h.z);
        let expected = b + (offset - b) * HEART_BLEND;
        assert_near(p.position(), expected, 1e-4);
    }
}

#[test]
fn pyramid_spins_about_y_with_time() {
    let s = HandState {
        is_triangle: true,
        ..HandState::at(Vec2::new(0.5, 0.5))
    };
    // A quarter turn: 2 rad/s for pi/4 seconds.
    let t = std::f32::consts::FRAC_PI_4;
    assert!((t * PYRAMID_SPIN_RATE - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    let mut f = field();
    let start = positions(&f);
    f.tick(Some(&s), t, &viewport(), &mut BitmapFont);

    for (p, b) in f.particles().iter().zip(start) {
        let v = p.pyramid;
        let turned = Vec3::new(-v.z, v.y, v.x);
        let expected = b + (turned - b) * PYRAMID_BLEND;
        assert_near(p.position(), expected, 1e-4);
    }
}

#[test]
fn scatter_drifts_on_slow_waves() {
    let t = 7.5;
    let mut f = field();
    let start = positions(&f);
    f.tick(Some(&HandState::default()), t, &viewport(), &mut BitmapFont);
    assert_eq!(f.active(), Formation::Scatter);

    let center = f.center();
    for (p, b) in f.particles().iter().zip(start) {
        let sc = p.scatter;
        let wave = Vec3::new(
            (t * SCATTER_WAVE_FREQ[0] + sc.y).sin() * SCATTER_WAVE_AMPLITUDE,
            (t * SCATTER_WAVE_FREQ[1] + sc.x).cos() * SCATTER_WAVE_AMPLITUDE,
            0.0,
        );
        let expected = b + (center + sc + wave - b) * SCATTER_BLEND;
        assert_near(p.position(), expected, 1e-4);
    }
}

#[test]
fn glyph_blends_a_tenth_of_the_way_per_tick() {
    let vp = viewport();
    let s = HandState {
        grip: 0.2,
        finger_count: 4,
        ..HandState::at(Vec2::new(0.35, 0.4))
    };
    let mut f = field();
    let start = positions(&f);
    f.tick(Some(&s), 0.0, &vp, &mut BitmapFont);
    assert_eq!(f.active(), Formation::Glyph);

    let center = hand_to_world(s.position, &vp, FieldParams::default().capture_aspect);
    for ((p, b), t) in f.particles().iter().zip(start).zip(f.glyph().targets()) {
        let expected = b + (center + *t - b) * GLYPH_BLEND;
        assert_near(p.position(), expected, 1e-4);
    }
}

#[test]
fn free_formations_tumble_by_their_own_spin() {
    let vp = viewport();
    let mut scatter = field();
    let mut glyph = field();
    let mut late = field();
    let before: Vec<_> = scatter.particles().iter().map(|p| p.orientation()).collect();
    for i in 0..3 {
        scatter.tick(Some(&HandState::default()), i as f32, &vp, &mut BitmapFont);
        glyph.tick(Some(&counting(3)), i as f32, &vp, &mut BitmapFont);
        late.tick(Some(&HandState::default()), 50.0 + i as f32, &vp, &mut BitmapFont);
    }
    assert_eq!(glyph.active(), Formation::Glyph);

    let mut turned = 0;
    for (((a, g), l), q0) in scatter
        .particles()
        .iter()
        .zip(glyph.particles())
        .zip(late.particles())
        .zip(before)
    {
        // Spin advances per tick, not with the clock, and ignores the formation.
        assert!(a.orientation().angle_between(g.orientation()) < 1e-3);
        assert!(a.orientation().angle_between(l.orientation()) < 1e-3);

        let swept = a.orientation().angle_between(q0);
        let bound = 3.0 * (a.spin.x.abs() + a.spin.y.abs() + a.spin.z.abs());
        assert!(swept <= bound + 1e-3, "{swept} > {bound}");
        if swept > 1e-3 {
            turned += 1;
        }
    }
    assert!(turned > COUNT / 2, "only {turned} particles turned");
}

/// Reports a full-size bitmap but fills only a handful of pixels.
struct Truncated;

impl GlyphRasterizer for Truncated {
    fn rasterize(&mut self, _text: &str, size: u32) -> swarm_core::Result<GlyphBitmap> {
        Ok(GlyphBitmap {
            size,
            luma: vec![255; 10],
        })
    }
}

#[test]
fn short_bitmap_from_the_rasterizer_does_not_stop_the_tick() {
    let mut f = field();
    let vp = viewport();
    for t in 0..3 {
        f.tick(Some(&counting(2)), t as f32, &vp, &mut Truncated);
    }
    assert_eq!(f.active(), Formation::Glyph);
    assert_eq!(f.glyph().digit(), Some(2));
    assert_eq!(f.glyph().regenerations(), 1);
    assert_eq!(f.glyph().targets().len(), COUNT);
}
