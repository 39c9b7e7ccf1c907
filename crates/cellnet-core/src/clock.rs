//! Animation time and frame statistics.

use std::collections::VecDeque;
use std::time::Duration;

// Upper bound on a single step so a backgrounded tab does not fast-forward the
// animation by minutes when it comes back.
const MAX_STEP: Duration = Duration::from_millis(250);

/// Elapsed animation time that can be paused without a jump on resume.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    elapsed: Duration,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by the wall-clock delta since the previous frame.
    pub fn tick(&mut self, dt: Duration) {
        if !self.paused {
            self.elapsed += dt.min(MAX_STEP);
        }
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}

/// Rolling frame-time window for fps reporting.
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    since_report: Duration,
    report_every: Duration,
}

impl FrameStats {
    pub fn new(max_samples: usize, report_every: Duration) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            since_report: Duration::ZERO,
            report_every,
        }
    }

    /// Record one frame; returns the average fps when a report is due.
    pub fn record(&mut self, dt: Duration) -> Option<f64> {
        if self.frame_times.len() == self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);
        self.since_report += dt;
        if self.since_report >= self.report_every {
            self.since_report = Duration::ZERO;
            Some(self.fps())
        } else {
            None
        }
    }

    pub fn fps(&self) -> f64 {
        let total: f64 = self.frame_times.iter().map(|d| d.as_secs_f64()).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.frame_times.len() as f64 / total
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_does_not_advance() {
        let mut c = FrameClock::new();
        c.tick(Duration::from_millis(100));
        assert!(c.toggle_pause());
        c.tick(Duration::from_millis(100));
        assert!((c.elapsed_secs() - 0.1).abs() < 1e-6);
        assert!(!c.toggle_pause());
        c.tick(Duration::from_millis(50));
        assert!((c.elapsed_secs() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut c = FrameClock::new();
        c.tick(Duration::from_secs(30));
        assert!((c.elapsed_secs() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn stats_window_and_reporting() {
        let mut s = FrameStats::new(4, Duration::from_millis(100));
        assert_eq!(s.fps(), 0.0);
        for _ in 0..5 {
            let _ = s.record(Duration::from_millis(20));
        }
        assert_eq!(s.sample_count(), 4);
        assert!((s.fps() - 50.0).abs() < 1e-6);
        let mut s = FrameStats::new(8, Duration::from_millis(50));
        assert!(s.record(Duration::from_millis(20)).is_none());
        assert!(s.record(Duration::from_millis(20)).is_none());
        assert!(s.record(Duration::from_millis(20)).is_some());
    }
}
