//! Instance transforms for the circle mesh.
//!
//! Every ring (and bloom circle) is the same unit circle, so the renderer keeps
//! one mesh and one instance buffer per batch. This module produces the
//! per-instance data; the GPU side uploads [`InstanceSet::active`] once.

use crate::error::CoreError;
use crate::scene::{BloomCircle, Ring};
use bytemuck::Zeroable;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Anything drawn with the shared circle mesh.
pub trait Circle {
    fn center(&self) -> Vec3;
    fn radius(&self) -> f32;
    fn opacity(&self) -> f32;
}

impl Circle for Ring {
    fn center(&self) -> Vec3 {
        self.center_offset
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl Circle for BloomCircle {
    fn center(&self) -> Vec3 {
        self.center
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// GPU layout of one circle instance (column-major model matrix + opacity).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CircleInstance {
    pub model: [[f32; 4]; 4],
    pub opacity: f32,
    pub _pad: [f32; 3],
}

impl CircleInstance {
    pub fn new(transform: Mat4, opacity: f32) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            opacity,
            _pad: [0.0; 3],
        }
    }
}

#[inline]
pub fn circle_transform(center: Vec3, radius: f32) -> Mat4 {
    Mat4::from_translation(center) * Mat4::from_scale(Vec3::splat(radius))
}

/// Fixed-capacity instance slots plus the active count.
pub struct InstanceSet {
    slots: Box<[CircleInstance]>,
    active: usize,
}

impl InstanceSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![CircleInstance::zeroed(); capacity].into_boxed_slice(),
            active: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn active(&self) -> &[CircleInstance] {
        &self.slots[..self.active]
    }

    /// Write one transform per circle into slots `0..circles.len()` and make
    /// exactly those slots active.
    pub fn sync_instances<C: Circle>(&mut self, circles: &[C]) -> Result<(), CoreError> {
        if circles.len() > self.slots.len() {
            return Err(CoreError::InstanceCapacityExceeded {
                capacity: self.slots.len(),
                requested: circles.len(),
            });
        }
        for (slot, circle) in self.slots.iter_mut().zip(circles) {
            *slot = CircleInstance::new(
                circle_transform(circle.center(), circle.radius()),
                circle.opacity(),
            );
        }
        self.active = circles.len();
        Ok(())
    }
}

/// Unit circle in the XZ plane as a closed line list: `segment_count` edges,
/// two vertices each.
pub fn unit_circle(segment_count: u32) -> Vec<[f32; 3]> {
    let n = segment_count.max(3);
    let mut verts = Vec::with_capacity(n as usize * 2);
    for i in 0..n {
        let a0 = TAU * i as f32 / n as f32;
        let a1 = TAU * (i + 1) as f32 / n as f32;
        verts.push([a0.cos(), 0.0, a0.sin()]);
        verts.push([a1.cos(), 0.0, a1.sin()]);
    }
    verts
}
