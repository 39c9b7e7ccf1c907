//! Screen-space placement of text labels.
//!
//! Text rendering itself belongs to the front-end; this only answers where a
//! label lands on screen, how large and at what angle, given the current scene
//! transform and camera.

use crate::camera::Camera;
use crate::scene::TextLabel;
use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::{FRAC_PI_2, PI};

// Labels whose anchor falls this far outside NDC are culled.
const NDC_MARGIN: f32 = 1.15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenLabel<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    /// Radians, clockwise in screen space, kept within ±90° so text reads upright.
    pub rotation: f32,
    pub font_px: f32,
    pub opacity: f32,
}

#[inline]
fn to_screen(clip: Vec4, width: f32, height: f32) -> (f32, f32) {
    let nx = clip.x / clip.w;
    let ny = clip.y / clip.w;
    ((nx * 0.5 + 0.5) * width, (0.5 - ny * 0.5) * height)
}

#[inline]
fn upright(angle: f32) -> f32 {
    if angle > FRAC_PI_2 {
        angle - PI
    } else if angle < -FRAC_PI_2 {
        angle + PI
    } else {
        angle
    }
}

/// Project one label. Returns `None` when it is behind the camera, outside the
/// depth range or well off screen.
pub fn project_label<'a>(
    label: &'a TextLabel,
    scene_transform: Mat4,
    camera: &Camera,
    width: f32,
    height: f32,
) -> Option<ScreenLabel<'a>> {
    let view_proj = camera.view_projection();
    let world = scene_transform.transform_point3(label.position);
    let clip = view_proj * world.extend(1.0);
    if clip.w <= camera.znear {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if ndc.x.abs() > NDC_MARGIN || ndc.y.abs() > NDC_MARGIN || !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }
    let (x, y) = to_screen(clip, width, height);

    let radial = Vec3::new(label.rotation_angle.cos(), 0.0, label.rotation_angle.sin());
    let ahead = scene_transform.transform_point3(label.position + radial * 0.1);
    let ahead_clip = view_proj * ahead.extend(1.0);
    let rotation = if ahead_clip.w > camera.znear {
        let (ax, ay) = to_screen(ahead_clip, width, height);
        upright((ay - y).atan2(ax - x))
    } else {
        0.0
    };

    let focal = 1.0 / (camera.fovy_radians * 0.5).tan();
    let font_px = label.font_size * focal / clip.w * height * 0.5;

    Some(ScreenLabel {
        text: &label.text,
        x,
        y,
        rotation,
        font_px,
        opacity: label.opacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_at(position: Vec3, angle: f32) -> TextLabel {
        TextLabel {
            text: "gNB-12".into(),
            position,
            rotation_angle: angle,
            opacity: 0.7,
            font_size: 0.2,
            ring_index: 0,
            angle,
        }
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera::new(1.0);
        let l = label_at(Vec3::ZERO, 0.0);
        let s = project_label(&l, Mat4::IDENTITY, &cam, 800.0, 800.0).unwrap();
        assert!((s.x - 400.0).abs() < 0.5);
        assert!((s.y - 400.0).abs() < 0.5);
        assert!(s.font_px > 0.0);
        assert!(s.rotation.abs() <= FRAC_PI_2 + 1e-5);
    }

    #[test]
    fn label_behind_camera_is_culled() {
        let cam = Camera::new(1.0);
        let behind = cam.eye + (cam.eye - cam.target);
        let l = label_at(behind, 0.0);
        assert!(project_label(&l, Mat4::IDENTITY, &cam, 800.0, 600.0).is_none());
    }

    #[test]
    fn radial_label_on_left_is_flipped_upright() {
        let cam = Camera::new(1.0);
        let l = label_at(Vec3::new(-3.0, 0.0, 0.0), PI);
        let s = project_label(&l, Mat4::IDENTITY, &cam, 800.0, 800.0).unwrap();
        assert!(s.rotation.abs() < 0.3, "rotation {}", s.rotation);
    }

    #[test]
    fn nearer_labels_are_larger() {
        let cam = Camera::new(1.0);
        let near = label_at(Vec3::new(0.0, 0.0, 6.0), 0.0);
        let far = label_at(Vec3::new(0.0, 0.0, -6.0), 0.0);
        let a = project_label(&near, Mat4::IDENTITY, &cam, 800.0, 800.0).unwrap();
        let b = project_label(&far, Mat4::IDENTITY, &cam, 800.0, 800.0).unwrap();
        assert!(a.font_px > b.font_px);
    }
}
