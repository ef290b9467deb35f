// Shared gesture/formation tuning constants used by the core and the web frontend.

// Particle field
pub const DEFAULT_PARTICLE_COUNT: usize = 2000;
pub const DEFAULT_SEED: u64 = 42;

// Capture frame (reference webcam resolution)
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

// Hand tracking
pub const MAX_HANDS: usize = 2;
pub const LANDMARKS_PER_HAND: usize = 21;
pub const POSITION_SMOOTHING: f32 = 0.2; // per-frame decay toward the raw anchor

// Grip: middle-fingertip to wrist distance mapped onto [0, 1]
pub const GRIP_CLOSED_DIST: f32 = 0.15; // at or below => grip 1
pub const GRIP_OPEN_DIST: f32 = 0.35; // at or above => grip 0

// Finger-heart and pinch (thumb tip to index tip)
pub const LOVE_SINGLE_DIST: f32 = 0.05;
pub const PINCH_DIST: f32 = 0.08;

// Two-hand gestures
pub const TWO_HAND_INDEX_DIST: f32 = 0.15; // index tips together
pub const LOVE_DOUBLE_THUMB_DIST: f32 = 0.15; // thumbs together as well => double heart
pub const TRIANGLE_THUMB_DIST: f32 = 0.20; // thumbs apart => pyramid

// Formation selection thresholds
pub const SPHERE_GRIP_MIN: f32 = 0.7;
pub const GLYPH_GRIP_MAX: f32 = 0.5;

// Formation geometry
pub const SCATTER_EXTENT: [f32; 3] = [15.0, 15.0, 10.0];
pub const SPHERE_RADIUS: f32 = 1.5;
pub const SPHERE_DENSITY: f32 = 0.8;
pub const PYRAMID_APEX: [f32; 3] = [0.0, 2.5, 0.0];
pub const PYRAMID_BASE: [[f32; 3]; 3] = [[0.0, -1.5, 2.0], [1.8, -1.5, -1.0], [-1.8, -1.5, -1.0]];
pub const PYRAMID_JITTER: f32 = 0.2;
pub const HEART_SCALE: f32 = 0.12;
pub const HEART_THICKNESS: f32 = 1.5;
pub const HEART_SINGLE_SCALE: f32 = 0.5;

// Glyph rasterization
pub const GLYPH_BITMAP_SIZE: u32 = 100;
pub const GLYPH_SAMPLE_STRIDE: usize = 2;
pub const GLYPH_LUMA_THRESHOLD: u8 = 128;
pub const GLYPH_WORLD_SPAN: f32 = 10.0;

// Animation
pub const HEART_PULSE_FREQ: f32 = 8.0; // rad/s
pub const HEART_PULSE_AMOUNT: f32 = 0.1;
pub const PYRAMID_SPIN_RATE: f32 = 2.0; // rad/s about +Y
pub const SCATTER_WAVE_FREQ: [f32; 2] = [0.5, 0.3]; // rad/s for x and y
pub const SCATTER_WAVE_AMPLITUDE: f32 = 0.5;

// Exponential blend rates per formation (value += (target - value) * rate)
pub const HEART_BLEND: f32 = 0.15;
pub const PYRAMID_BLEND: f32 = 0.15;
pub const SPHERE_BLEND: f32 = 0.2;
pub const GLYPH_BLEND: f32 = 0.1;
pub const SCATTER_BLEND: f32 = 0.03;
pub const SCALE_BLEND: f32 = 0.1;

// Particle visual size per formation (multiplied by the particle's base scale)
pub const SCATTER_SIZE: f32 = 0.08;
pub const GLYPH_SIZE: f32 = 0.08;
pub const PYRAMID_SIZE: f32 = 0.10;
pub const HEART_SIZE: f32 = 0.12;
pub const SPHERE_SIZE: f32 = 0.15;

// Per-particle randomization
pub const BASE_SCALE_MIN: f32 = 0.5;
pub const BASE_SCALE_SPAN: f32 = 1.5;
pub const SPIN_SPEED_SPAN: f32 = 0.1; // rad per tick, centered on zero

pub const PARTICLE_PALETTE: [[f32; 3]; 5] = [
    [0.0, 1.0, 1.0],       // #00ffff
    [1.0, 0.0, 1.0],       // #ff00ff
    [1.0, 1.0, 1.0],       // #ffffff
    [1.0, 0.843, 0.0],     // #ffd700
    [0.439, 0.631, 1.0],   // #70a1ff
];

// Presentation: material tint per formation
pub const TINT_SCATTER: [f32; 3] = [0.0, 1.0, 1.0]; // cyan
pub const TINT_SPHERE: [f32; 3] = [1.0, 1.0, 1.0]; // white
pub const TINT_PYRAMID: [f32; 3] = [1.0, 0.843, 0.0]; // gold
pub const TINT_LOVE: [f32; 3] = [1.0, 0.0, 0.333]; // #ff0055

pub const EMISSIVE_SCATTER: f32 = 1.0;
pub const EMISSIVE_SPHERE: f32 = 1.5;
pub const EMISSIVE_PYRAMID: f32 = 3.0;
pub const EMISSIVE_LOVE: f32 = 3.0;

pub const BLOOM_IDLE: f32 = 0.5;
pub const BLOOM_GRIP: f32 = 1.0;
pub const BLOOM_GRIP_MIN: f32 = 0.5;
pub const BLOOM_PINCH: f32 = 2.0;
pub const BLOOM_PYRAMID: f32 = 3.0;
pub const BLOOM_LOVE: f32 = 3.5;
pub const PRESENTATION_BLEND: f32 = 0.1;

// Voice
pub const VOICE_LOCALE: &str = "id-ID";
pub const VOICE_RATE: f32 = 1.1;
pub const PHRASE_UNLOCKED: &str = "Sistem Aktif";
pub const PHRASE_LOVE_SINGLE: &str = "Saranghae";
pub const PHRASE_LOVE_DOUBLE: &str = "Cinta Besar";
pub const PHRASE_PYRAMID: &str = "Piramida";
pub const PHRASE_PINCH: &str = "Fokus";
