//! Camera and screen-mapping types shared with the web frontend.
//!
//! These avoid platform APIs so the mapping from normalized capture
//! coordinates to world units can be exercised on the host.

use crate::constants::{CAPTURE_HEIGHT, CAPTURE_WIDTH};
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera on +Z looking at the origin.
    pub fn looking_at_origin(distance: f32, fovy_radians: f32, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Visible world-space rectangle on the plane through the target.
    pub fn viewport(&self) -> Viewport {
        let distance = self.eye.distance(self.target);
        let height = 2.0 * distance * (self.fovy_radians * 0.5).tan();
        Viewport {
            width: height * self.aspect,
            height,
            aspect: self.aspect,
        }
    }
}

/// Display viewport: world extent at the formation plane plus the screen
/// aspect it was derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub aspect: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            aspect: width / height.max(f32::EPSILON),
        }
    }
}

pub fn capture_aspect() -> f32 {
    CAPTURE_WIDTH as f32 / CAPTURE_HEIGHT as f32
}

/// Map a raw normalized hand position into world units on the z=0 plane.
///
/// The capture image is shown mirrored (selfie view) and cover-fitted to the
/// screen, so x is flipped and whichever axis is cropped gets stretched
/// around the center before scaling to the viewport.
pub fn hand_to_world(raw: Vec2, viewport: &Viewport, capture_aspect: f32) -> Vec3 {
    let mut fixed = Vec2::new(1.0 - raw.x, raw.y);
    if viewport.aspect > capture_aspect {
        let scale = viewport.aspect / capture_aspect;
        fixed.y = (fixed.y - 0.5) * scale + 0.5;
    } else {
        let scale = capture_aspect / viewport.aspect;
        fixed.x = (fixed.x - 0.5) * scale + 0.5;
    }
    Vec3::new(
        (fixed.x - 0.5) * viewport.width,
        -(fixed.y - 0.5) * viewport.height,
        0.0,
    )
}
