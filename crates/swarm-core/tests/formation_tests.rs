use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use swarm_core::constants::*;
use swarm_core::formation::{
    heart_curve, heart_point, pyramid_point, pyramid_vertices, scatter_offset, sphere_point,
    PYRAMID_EDGES,
};
use swarm_core::{
    Anchor, Formation, GlyphBitmap, GlyphRasterizer, GlyphTargets, HandState, LoveMode,
    SwarmError,
};

fn hand(grip: f32, fingers: u8) -> HandState {
    HandState {
        grip,
        finger_count: fingers,
        ..HandState::at(Vec2::new(0.5, 0.5))
    }
}

#[test]
fn love_outranks_everything() {
    let s = HandState {
        love_mode: LoveMode::Single,
        is_triangle: true,
        ..hand(0.9, 3)
    };
    assert_eq!(Formation::select(&s), Formation::Heart);
}

#[test]
fn triangle_outranks_fist() {
    let s = HandState {
        is_triangle: true,
        ..hand(0.9, 0)
    };
    assert_eq!(Formation::select(&s), Formation::Pyramid);
}

#[test]
fn fist_outranks_counting() {
    assert_eq!(Formation::select(&hand(0.8, 2)), Formation::Sphere);
    assert_eq!(Formation::select(&hand(0.7, 0)), Formation::Scatter);
}

#[test]
fn counting_needs_open_hand() {
    assert_eq!(Formation::select(&hand(0.2, 3)), Formation::Glyph);
    assert_eq!(Formation::select(&hand(0.6, 3)), Formation::Scatter);
    assert_eq!(Formation::select(&hand(0.2, 0)), Formation::Scatter);
}

#[test]
fn neutral_state_scatters() {
    assert_eq!(Formation::select(&HandState::default()), Formation::Scatter);
}

#[test]
fn centered_formations_anchor_at_origin() {
    let double = HandState {
        love_mode: LoveMode::Double,
        ..hand(0.0, 0)
    };
    let single = HandState {
        love_mode: LoveMode::Single,
        ..hand(0.0, 0)
    };
    assert_eq!(Formation::Heart.anchor(&double), Anchor::Origin);
    assert_eq!(Formation::Heart.anchor(&single), Anchor::Hand);
    assert_eq!(Formation::Pyramid.anchor(&single), Anchor::Origin);
    assert_eq!(Formation::Sphere.anchor(&single), Anchor::Hand);
    assert_eq!(Formation::Scatter.anchor(&single), Anchor::Hand);
}

#[test]
fn sphere_points_lie_on_radius_with_even_heights() {
    let n = 500;
    let mut prev_z = f32::NEG_INFINITY;
    for i in 0..n {
        let p = sphere_point(i, n, SPHERE_RADIUS);
        assert!((p.length() - SPHERE_RADIUS).abs() < 1e-4, "point {i} off sphere");
        // Heights step evenly by 2r/n from the south pole.
        let expected_z = SPHERE_RADIUS * (-1.0 + 2.0 * i as f32 / n as f32);
        assert!((p.z - expected_z).abs() < 1e-4);
        assert!(p.z > prev_z);
        prev_z = p.z;
    }
}

#[test]
fn heart_curve_top_cleft_and_bottom_tip() {
    let (x0, y0) = heart_curve(0.0);
    assert!(x0.abs() < 1e-5);
    assert!((y0 - 5.0).abs() < 1e-4);
    let (xp, yp) = heart_curve(std::f32::consts::PI);
    assert!(xp.abs() < 1e-3);
    assert!((yp + 17.0).abs() < 1e-3);
}

#[test]
fn heart_points_are_scaled_with_bounded_depth() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 200;
    for i in 0..n {
        let p = heart_point(i, n, &mut rng);
        assert!(p.x.abs() <= 16.0 * HEART_SCALE + 1e-4);
        assert!(p.z.abs() <= HEART_THICKNESS * 0.5);
    }
}

#[test]
fn pyramid_points_hug_their_edge() {
    let mut rng = StdRng::seed_from_u64(3);
    let v = pyramid_vertices();
    let max_jitter = (3.0_f32).sqrt() * 0.5 * PYRAMID_JITTER + 1e-4;
    for i in 0..120 {
        let p = pyramid_point(i, &mut rng);
        let (a, b) = PYRAMID_EDGES[i % 6];
        let ab = v[b] - v[a];
        let t = ((p - v[a]).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
        let closest = v[a] + ab * t;
        assert!(p.distance(closest) <= max_jitter, "particle {i} strayed");
    }
}

#[test]
fn scatter_offsets_fill_the_box() {
    let mut rng = StdRng::seed_from_u64(11);
    let half = Vec3::from_array(SCATTER_EXTENT) * 0.5;
    for _ in 0..1000 {
        let p = scatter_offset(&mut rng);
        assert!(p.abs().cmple(half).all());
    }
}

struct Blank;

impl GlyphRasterizer for Blank {
    fn rasterize(&mut self, _text: &str, size: u32) -> swarm_core::Result<GlyphBitmap> {
        Ok(GlyphBitmap::blank(size))
    }
}

struct Broken;

impl GlyphRasterizer for Broken {
    fn rasterize(&mut self, _text: &str, _size: u32) -> swarm_core::Result<GlyphBitmap> {
        Err(SwarmError::Raster("no canvas".into()))
    }
}

/// Lights a single pixel and counts calls.
#[derive(Default)]
struct Dot {
    calls: usize,
}

impl GlyphRasterizer for Dot {
    fn rasterize(&mut self, _text: &str, size: u32) -> swarm_core::Result<GlyphBitmap> {
        self.calls += 1;
        let mut bmp = GlyphBitmap::blank(size);
        bmp.luma[0] = 255;
        Ok(bmp)
    }
}

fn assert_jitter(targets: &GlyphTargets) {
    let half = GLYPH_WORLD_SPAN * 0.5;
    for t in targets.targets() {
        assert!(t.x.abs() <= half && t.y.abs() <= half);
        assert_eq!(t.z, 0.0);
    }
}

#[test]
fn blank_bitmap_falls_back_to_jitter() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut g = GlyphTargets::new(64);
    assert!(g.ensure(4, &mut Blank, &mut rng));
    assert_eq!(g.targets().len(), 64);
    assert_jitter(&g);
    assert_eq!(g.digit(), Some(4));
}

#[test]
fn rasterizer_error_falls_back_to_jitter() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut g = GlyphTargets::new(64);
    assert!(g.ensure(2, &mut Broken, &mut rng));
    assert_jitter(&g);
    assert_eq!(g.regenerations(), 1);
}

/// Claims a full-size bitmap but only fills a few pixels.
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
fn short_bitmap_is_rejected_and_falls_back_to_jitter() {
    let short = GlyphBitmap {
        size: 100,
        luma: vec![255; 10],
    };
    assert!(matches!(short.check(), Err(SwarmError::Raster(_))));
    assert_eq!(short.get(99, 99), 0);

    let mut rng = StdRng::seed_from_u64(1);
    let mut g = GlyphTargets::new(64);
    assert!(g.ensure(2, &mut Truncated, &mut rng));
    assert_eq!(g.targets().len(), 64);
    assert_jitter(&g);
    assert_eq!(g.digit(), Some(2));
    assert_eq!(g.regenerations(), 1);
}

#[test]
fn same_digit_is_cached() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut g = GlyphTargets::new(16);
    let mut dot = Dot::default();
    assert!(g.ensure(3, &mut dot, &mut rng));
    for _ in 0..20 {
        assert!(!g.ensure(3, &mut dot, &mut rng));
    }
    assert_eq!(dot.calls, 1);
    assert_eq!(g.regenerations(), 1);
    let corner = Vec3::new(-GLYPH_WORLD_SPAN * 0.5, GLYPH_WORLD_SPAN * 0.5, 0.0);
    assert!(g.targets().iter().all(|t| *t == corner));

    assert!(g.ensure(5, &mut dot, &mut rng));
    assert_eq!(dot.calls, 2);
    assert_eq!(g.regenerations(), 2);
}
