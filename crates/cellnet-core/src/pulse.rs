//! Per-frame pulse animation for radial line segments.
//!
//! Each segment runs its own extend → hold → retract cycle, shifted by its
//! [`AnimPhase`]. The animator owns a flat position/opacity buffer pair that is
//! sized once from the segment list and rewritten in place every frame; the
//! buffers are boxed slices so they cannot grow or shrink after construction.

use crate::constants::{PULSE_CYCLE, PULSE_EXTEND_END, PULSE_HOLD_END};
use crate::error::CoreError;
use crate::scene::{AnimPhase, LineSegment};

pub const FLOATS_PER_SEGMENT_POSITION: usize = 6;
pub const FLOATS_PER_SEGMENT_OPACITY: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSample {
    /// Un-eased extension in `[0, 1]`.
    pub progress: f32,
    pub opacity: f32,
}

/// Position within the 4-unit cycle for a segment at `elapsed`.
#[inline]
pub fn cycle_time(elapsed: f32, phase: &AnimPhase) -> f32 {
    ((elapsed + phase.phase_offset) * phase.speed_multiplier + phase.delay).rem_euclid(PULSE_CYCLE)
}

/// Extend / hold / retract curve for a cycle time in `[0, PULSE_CYCLE)`.
#[inline]
pub fn phase_at(cycle_time: f32) -> PhaseSample {
    let extend_len = PULSE_EXTEND_END;
    let retract_len = PULSE_CYCLE - PULSE_HOLD_END;
    if (0.0..PULSE_EXTEND_END).contains(&cycle_time) {
        let progress = cycle_time / extend_len;
        PhaseSample {
            progress,
            opacity: (2.0 * progress).min(1.0),
        }
    } else if (PULSE_EXTEND_END..PULSE_HOLD_END).contains(&cycle_time) {
        PhaseSample {
            progress: 1.0,
            opacity: 1.0,
        }
    } else if (PULSE_HOLD_END..PULSE_CYCLE).contains(&cycle_time) {
        let progress = 1.0 - (cycle_time - PULSE_HOLD_END) / retract_len;
        PhaseSample {
            progress,
            opacity: progress,
        }
    } else {
        // NaN or out-of-range input
        PhaseSample {
            progress: 0.0,
            opacity: 0.0,
        }
    }
}

/// Symmetric cubic ease-in/ease-out.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationBuffers {
    positions: Box<[f32]>,
    opacities: Box<[f32]>,
}

impl AnimationBuffers {
    pub fn with_segment_count(segment_count: usize) -> Self {
        Self {
            positions: vec![0.0; segment_count * FLOATS_PER_SEGMENT_POSITION].into_boxed_slice(),
            opacities: vec![0.0; segment_count * FLOATS_PER_SEGMENT_OPACITY].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.opacities.len() / FLOATS_PER_SEGMENT_OPACITY
    }

    /// Two xyz endpoints per segment, start first.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// One opacity per vertex, two per segment.
    #[inline]
    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }
}

pub struct PulseAnimator {
    buffers: AnimationBuffers,
}

impl PulseAnimator {
    /// Size the buffers for `segments` and fill them with the `t = 0` frame.
    pub fn new(segments: &[LineSegment]) -> Self {
        let mut animator = Self {
            buffers: AnimationBuffers::with_segment_count(segments.len()),
        };
        animator.write_frame(segments, 0.0);
        animator
    }

    #[inline]
    pub fn buffers(&self) -> &AnimationBuffers {
        &self.buffers
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.buffers.segment_count()
    }

    /// Rewrite every slot for `elapsed`. `segments` must be the same sequence
    /// the animator was built from; a length mismatch leaves the buffers
    /// untouched and reports a contract violation.
    pub fn advance(&mut self, segments: &[LineSegment], elapsed: f32) -> Result<(), CoreError> {
        let expected = self.segment_count();
        if segments.len() != expected {
            return Err(CoreError::BufferLengthMismatch {
                expected,
                actual: segments.len(),
            });
        }
        self.write_frame(segments, elapsed);
        Ok(())
    }

    fn write_frame(&mut self, segments: &[LineSegment], elapsed: f32) {
        let slots = self
            .buffers
            .positions
            .chunks_exact_mut(FLOATS_PER_SEGMENT_POSITION)
            .zip(
                self.buffers
                    .opacities
                    .chunks_exact_mut(FLOATS_PER_SEGMENT_OPACITY),
            );
        for (segment, (pos, alpha)) in segments.iter().zip(slots) {
            let sample = phase_at(cycle_time(elapsed, &segment.anim_phase));
            let eased = ease_in_out_cubic(sample.progress);
            let start = segment.point_at(segment.start_radius);
            let end = segment.point_at(segment.start_radius + segment.length() * eased);
            pos[0] = start.x;
            pos[1] = start.y;
            pos[2] = start.z;
            pos[3] = end.x;
            pos[4] = end.y;
            pos[5] = end.z;
            let a = segment.base_opacity * sample.opacity;
            alpha[0] = a;
            alpha[1] = a;
        }
    }
}
