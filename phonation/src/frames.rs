//! Placement of fixed-length analysis frames over a signal.

/// A grid of equally spaced frames, centred within the signal.
///
/// All positions are in samples. `step` may be fractional; frame starts are
/// rounded to the nearest sample.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameGrid {
    count: usize,
    first_start: f64,
    step: f64,
    span: usize,
    last_start: usize,
}

impl FrameGrid {
    /// Lays out as many frames of `span` samples as fit in `total` samples.
    pub(crate) fn new(total: usize, span: usize, step: f64) -> Self {
        if span == 0 || step <= 0.0 || total < span {
            return Self {
                count: 0,
                first_start: 0.0,
                step,
                span,
                last_start: 0,
            };
        }
        let room = (total - span) as f64;
        // Tolerate step sizes like 0.01 * fs that land a hair above an integer.
        let count = (room / step + 1e-9).floor() as usize + 1;
        let used = (count - 1) as f64 * step;
        Self {
            count,
            first_start: (room - used) / 2.0,
            step,
            span,
            last_start: total - span,
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// First sample of frame `i`.
    pub(crate) fn start(&self, i: usize) -> usize {
        let start = (self.first_start + i as f64 * self.step).round() as usize;
        start.min(self.last_start)
    }

    /// Centre of frame `i` in seconds.
    pub(crate) fn time(&self, i: usize, sample_rate: f64) -> f64 {
        (self.first_start + i as f64 * self.step + self.span as f64 / 2.0) / sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_centering() {
        let grid = FrameGrid::new(16000, 800, 160.0);
        assert_eq!(grid.count(), 96);
        assert_eq!(grid.start(0), 0);
        assert_eq!(grid.start(95), 15200);
        assert!((grid.time(0, 16000.0) - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_leftover_is_split() {
        // 1000 - 400 = 600 of room, step 250 -> 3 frames using 500, 50 each side.
        let grid = FrameGrid::new(1000, 400, 250.0);
        assert_eq!(grid.count(), 3);
        assert_eq!(grid.start(0), 50);
        assert_eq!(grid.start(2), 550);
    }

    #[test]
    fn test_too_short() {
        assert_eq!(FrameGrid::new(100, 400, 160.0).count(), 0);
        assert_eq!(FrameGrid::new(1000, 0, 160.0).count(), 0);
    }
}
