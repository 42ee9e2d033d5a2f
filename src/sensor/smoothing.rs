use std::collections::VecDeque;

use crate::sensor::TiltSample;

/// Fixed-capacity moving-average window over tilt samples.
///
/// The published average is all-or-nothing: it is recomputed only when the
/// window is exactly full, and holds its previous value (initially zero)
/// during the cold start and any transient underfill. Both axes live in one
/// queue so eviction can never desynchronize them.
#[derive(Debug)]
pub struct SmoothingWindow {
    samples: VecDeque<TiltSample>,
    capacity: usize,
    average: (f32, f32),
}

impl SmoothingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "smoothing window capacity must be non-zero");

        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            average: (0.0, 0.0),
        }
    }

    pub fn push(&mut self, sample: TiltSample) {
        self.samples.push_back(sample);

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }

        if self.samples.len() == self.capacity {
            let n = self.capacity as f32;
            let (sum_x, sum_y) = self
                .samples
                .iter()
                .fold((0.0, 0.0), |(sx, sy), s| (sx + s.x, sy + s.y));

            self.average = (sum_x / n, sum_y / n);
        }
    }

    pub fn current_average(&self) -> (f32, f32) {
        self.average
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_pairs(window: &mut SmoothingWindow, pairs: &[(f32, f32)]) {
        for &(x, y) in pairs {
            window.push(TiltSample { x, y });
        }
    }

    const RAMP: [(f32, f32); 8] = [
        (1.0, 2.0),
        (2.0, 3.0),
        (3.0, 4.0),
        (4.0, 5.0),
        (5.0, 6.0),
        (6.0, 7.0),
        (7.0, 8.0),
        (8.0, 9.0),
    ];

    #[test]
    fn cold_start_holds_zero() {
        let mut window = SmoothingWindow::new(8);
        push_pairs(&mut window, &RAMP[..7]);
        assert_eq!(window.current_average(), (0.0, 0.0));
    }

    #[test]
    fn full_window_averages_all_samples() {
        let mut window = SmoothingWindow::new(8);
        push_pairs(&mut window, &RAMP);
        assert_eq!(window.current_average(), (4.5, 5.5));
    }

    #[test]
    fn ninth_sample_evicts_the_oldest() {
        let mut window = SmoothingWindow::new(8);
        push_pairs(&mut window, &RAMP);
        window.push(TiltSample { x: 100.0, y: 100.0 });

        // Mean of samples 2..8 plus (100, 100).
        let expected_x = (2.0 + 3.0 + 4.0 + 5.0 + 6.0 + 7.0 + 8.0 + 100.0) / 8.0;
        let expected_y = (3.0 + 4.0 + 5.0 + 6.0 + 7.0 + 8.0 + 9.0 + 100.0) / 8.0;
        assert_eq!(window.current_average(), (expected_x, expected_y));
    }

    #[test]
    fn only_the_most_recent_n_samples_count() {
        let mut window = SmoothingWindow::new(4);
        push_pairs(&mut window, &[(100.0, 100.0), (100.0, 100.0)]);
        push_pairs(&mut window, &[(1.0, 1.0); 4]);
        assert_eq!(window.current_average(), (1.0, 1.0));
    }

    #[test]
    fn capacity_one_tracks_the_latest_sample() {
        let mut window = SmoothingWindow::new(1);
        window.push(TiltSample { x: 2.5, y: -1.0 });
        assert_eq!(window.current_average(), (2.5, -1.0));
        window.push(TiltSample { x: -0.5, y: 3.0 });
        assert_eq!(window.current_average(), (-0.5, 3.0));
    }
}
