//! Per-frame transform assembly.
//!
//! [`FrameComposer`] turns an elapsed time and a viewport aspect ratio into the
//! uniform block for one frame. It keeps no clock of its own: the caller owns a
//! [`FrameClock`], advances it once per displayed frame and passes the elapsed
//! time in, so composing the same inputs always yields the same block.
//!
//! # Example
//!
//! ```
//! use turntable::{FrameClock, FrameComposer};
//!
//! let composer = FrameComposer::default();
//! let mut clock = FrameClock::new(60.0);
//!
//! let elapsed = clock.advance();
//! let uniforms = composer.compose(elapsed, 16.0 / 9.0, 0).unwrap();
//! assert_eq!(uniforms.light_count, 0);
//! ```

use crate::math::{
    Handedness, MathError, degrees_to_radians, inverse, normal_matrix, perspective_projection,
    rotation_y, translation,
};
use crate::uniforms::FrameUniforms;
use glam::{Mat3, Mat4, Vec3};
use std::f32::consts::{FRAC_PI_3, TAU};

const DEFAULT_FRAME_RATE: f32 = 60.0;

/// Fixed-step frame clock.
///
/// Each [`advance`](Self::advance) moves time forward by exactly
/// `1 / target_frame_rate`, so the animation speed is tied to frames presented
/// rather than wall time. Elapsed time is always `frame_index / rate`,
/// computed in `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    rate: f64,
    frame_index: u64,
}

impl FrameClock {
    /// Creates a clock at zero. Non-finite or non-positive rates fall back to 60.
    pub fn new(target_frame_rate: f32) -> Self {
        let rate = if target_frame_rate.is_finite() && target_frame_rate > 0.0 {
            target_frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };
        Self {
            rate: f64::from(rate),
            frame_index: 0,
        }
    }

    /// Advances one frame and returns the new elapsed time in seconds.
    pub fn advance(&mut self) -> f32 {
        self.frame_index = self.frame_index.wrapping_add(1);
        self.elapsed()
    }

    pub fn elapsed(&self) -> f32 {
        (self.frame_index as f64 / self.rate) as f32
    }

    /// Frames advanced since creation or the last reset.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Seconds added per frame.
    pub fn step(&self) -> f32 {
        self.rate.recip() as f32
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

/// The four matrices of one frame, before packing for the GPU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub normal: Mat3,
}

/// Static scene setup: where the camera sits, how it projects, how fast the
/// mesh spins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameComposer {
    pub camera_position: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub handedness: Handedness,
    /// Spin about +Y in radians per second.
    pub angular_speed: f32,
}

impl Default for FrameComposer {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(0.0, 0.5, -2.0),
            fov_y: degrees_to_radians(60.0),
            near: 0.1,
            far: 100.0,
            handedness: Handedness::Left,
            angular_speed: FRAC_PI_3,
        }
    }
}

impl FrameComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera_at(mut self, position: Vec3) -> Self {
        self.camera_position = position;
        self
    }

    pub fn with_fov_degrees(mut self, fov_degrees: f32) -> Self {
        self.fov_y = degrees_to_radians(fov_degrees);
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn with_angular_speed(mut self, radians_per_second: f32) -> Self {
        self.angular_speed = radians_per_second;
        self
    }

    /// Spin angle after `elapsed` seconds.
    pub fn angle_at(&self, elapsed: f32) -> f32 {
        self.angular_speed * elapsed
    }

    /// View matrix for the fixed camera: the inverse of its placement.
    pub fn view(&self) -> Result<Mat4, MathError> {
        inverse(translation(self.camera_position))
    }

    pub fn projection(&self, aspect: f32) -> Result<Mat4, MathError> {
        perspective_projection(self.fov_y, self.near, self.far, aspect, self.handedness)
    }

    /// Builds model, view, projection and normal matrices for one frame.
    ///
    /// # Errors
    ///
    /// Propagates [`MathError`] for a degenerate aspect ratio or clip planes.
    pub fn transforms(&self, elapsed: f32, aspect: f32) -> Result<FrameTransforms, MathError> {
        // One turn at most, whatever the elapsed time.
        let model = rotation_y(self.angle_at(elapsed).rem_euclid(TAU));
        Ok(FrameTransforms {
            model,
            view: self.view()?,
            projection: self.projection(aspect)?,
            normal: normal_matrix(model)?,
        })
    }

    /// Builds the uniform block for one frame.
    pub fn compose(
        &self,
        elapsed: f32,
        aspect: f32,
        light_count: u32,
    ) -> Result<FrameUniforms, MathError> {
        let t = self.transforms(elapsed, aspect)?;
        Ok(FrameUniforms::new(
            t.model,
            t.view,
            t.projection,
            t.normal,
            self.camera_position,
            light_count,
        ))
    }
}
