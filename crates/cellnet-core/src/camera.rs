//! Camera description and the time-driven "breathing" choreography.
//!
//! The eye never moves; the scene spins about +Y and pulses in scale while the
//! field of view swings in the opposite direction on the same phase.

use crate::constants::*;
use glam::{Mat4, Vec3};

/// Right-handed camera with perspective projection.
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
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: CAMERA_EYE,
            target: CAMERA_TARGET,
            up: Vec3::Y,
            aspect,
            fovy_radians: BASE_FOV_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Apply a choreographed pose (fov only; rotation and scale live in the
    /// scene transform).
    pub fn apply(&mut self, pose: &CameraPose) {
        self.fovy_radians = pose.fov_degrees.to_radians();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub rotation_y: f32,
    pub scale: f32,
    pub fov_degrees: f32,
}

impl CameraPose {
    pub fn scene_transform(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

pub fn choreograph(elapsed: f32) -> CameraPose {
    let breath = (elapsed * BREATH_FREQUENCY).sin();
    CameraPose {
        rotation_y: elapsed * ROTATION_SPEED,
        scale: 1.0 + breath * SCALE_AMPLITUDE,
        fov_degrees: BASE_FOV_DEGREES - breath * FOV_AMPLITUDE_DEGREES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn rest_pose_at_zero() {
        let p = choreograph(0.0);
        assert_eq!(p.rotation_y, 0.0);
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.fov_degrees, BASE_FOV_DEGREES);
    }

    #[test]
    fn fov_and_scale_share_a_phase() {
        // sin(t * 0.5) peaks at t = PI
        let p = choreograph(PI);
        assert!((p.scale - 1.05).abs() < 1e-5);
        assert!((p.fov_degrees - 33.0).abs() < 1e-4);
        let q = choreograph(3.0 * PI);
        assert!((q.scale - 0.95).abs() < 1e-5);
        assert!((q.fov_degrees - 57.0).abs() < 1e-4);
    }

    #[test]
    fn fov_stays_bounded() {
        for i in 0..2000 {
            let p = choreograph(i as f32 * 0.137);
            assert!(p.fov_degrees >= 33.0 - 1e-3 && p.fov_degrees <= 57.0 + 1e-3);
            assert!(p.scale >= 0.95 - 1e-5 && p.scale <= 1.05 + 1e-5);
        }
    }

    #[test]
    fn rotation_is_linear() {
        assert!((choreograph(10.0).rotation_y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn camera_apply_updates_fov() {
        let mut cam = Camera::new(16.0 / 9.0);
        cam.apply(&choreograph(PI));
        assert!((cam.fovy_radians - 33.0_f32.to_radians()).abs() < 1e-5);
        cam.set_viewport(800, 0);
        assert_eq!(cam.aspect, 800.0);
    }
}
