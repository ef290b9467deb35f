// Front-end scene, DOM and post-processing constants.
//
// Gesture and formation tuning lives in `swarm_core::constants`; this file
// only covers what the browser shell needs to draw and wire the page.

// Camera
// Eye sits on +Z looking at the origin; the formation plane is z = 0.
pub const CAMERA_Z: f32 = 12.0;
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Particle mesh
pub const OCTAHEDRON_RADIUS: f32 = 0.3;

// Lighting (direction the light travels, intensity)
pub const AMBIENT_LIGHT: f32 = 0.2;
pub const KEY_LIGHT_DIR: [f32; 3] = [-5.0, -5.0, -5.0];
pub const KEY_LIGHT_INTENSITY: f32 = 2.0;
pub const FILL_LIGHT_DIR: [f32; 3] = [5.0, 5.0, -2.0];
pub const FILL_LIGHT_INTENSITY: f32 = 1.0;
pub const FILL_LIGHT_COLOR: [f32; 3] = [0.0, 1.0, 1.0];
// Share of the emissive term that reaches the HDR target before bloom
pub const EMISSIVE_GAIN: f32 = 0.35;

// Post-processing
pub const BLOOM_THRESHOLD: f32 = 0.2;
pub const BLOOM_KNEE: f32 = 0.9; // soft ramp above the threshold
pub const CLEAR_COLOR: [f64; 3] = [0.0, 0.0, 0.0];
pub const CLEAR_ALPHA: f64 = 0.0; // transparent over the mirrored webcam

// Capture
pub const CAPTURE_FACING_MODE: &str = "user";
// HTMLMediaElement.readyState: HAVE_ENOUGH_DATA
pub const VIDEO_READY_STATE: u16 = 4;

// Glyph canvas
pub const GLYPH_FONT: &str = "bold 80px Arial";

// DOM ids
pub const CANVAS_ID: &str = "app-canvas";
pub const VIDEO_ID: &str = "webcam";
pub const HINT_ID: &str = "hint-overlay";
pub const HINT_TEXT: &str = "Magic Interface Ready";
