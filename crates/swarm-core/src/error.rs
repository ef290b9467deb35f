use thiserror::Error;

/// Failures surfaced by the core. None of them is fatal to the app; callers
/// skip the frame or fall back to the idle formation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwarmError {
    #[error("frame reports {0} hands, at most {max} are tracked", max = crate::constants::MAX_HANDS)]
    TooManyHands(usize),
    #[error("hand {hand} has {got} landmarks, expected {expected}")]
    LandmarkCount {
        hand: usize,
        got: usize,
        expected: usize,
    },
    #[error("hand {hand} landmark {index} is not finite")]
    NonFinite { hand: usize, index: usize },
    #[error("glyph rasterization failed: {0}")]
    Raster(String),
}

pub type Result<T> = std::result::Result<T, SwarmError>;
