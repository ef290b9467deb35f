pub mod camera;
pub mod constants;
pub mod error;
pub mod field;
pub mod formation;
pub mod gesture;
pub mod glyph;
pub mod landmarks;
pub mod pipeline;
pub mod presentation;

pub use camera::{hand_to_world, Camera, Viewport};
pub use error::{Result, SwarmError};
pub use field::{FieldParams, Particle, ParticleField, ParticleInstance};
pub use formation::{Anchor, Formation};
pub use gesture::{GestureClassifier, HandState, LoveMode, SharedHandState};
pub use glyph::{BitmapFont, GlyphBitmap, GlyphRasterizer, GlyphTargets};
pub use landmarks::{Hand, HandFrame, Landmark};
pub use pipeline::DetectionGate;
pub use presentation::{Announcement, Look, PresentationController};
