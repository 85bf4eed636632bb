//! Proximity Averaging
//!
//! The slow sample flag (every 250 ms) feeds one proximity reading into a
//! running window. When the window is full the mean is published and the
//! window starts over, so a report appears every 2.5 s with the default
//! window of ten samples.

use crate::system::config::PROXIMITY_AVERAGE_WINDOW;

/// Block average over a fixed number of proximity samples
#[derive(Debug)]
pub struct ProximityAverager {
    window: u8,
    count: u8,
    sum: u32,
    last_mean: Option<u16>,
}

impl ProximityAverager {
    pub const fn new() -> Self {
        Self::with_window(PROXIMITY_AVERAGE_WINDOW)
    }

    /// Averager over `window` samples (at least one)
    pub const fn with_window(window: u8) -> Self {
        Self {
            window: if window == 0 { 1 } else { window },
            count: 0,
            sum: 0,
            last_mean: None,
        }
    }

    /// Add a sample, returning the mean when it completes a window
    pub fn push(&mut self, raw: u16) -> Option<u16> {
        self.sum += raw as u32;
        self.count += 1;
        if self.count < self.window {
            return None;
        }

        let mean = (self.sum / self.window as u32) as u16;
        self.count = 0;
        self.sum = 0;
        self.last_mean = Some(mean);
        Some(mean)
    }

    /// Drop the partial window
    pub fn reset(&mut self) {
        self.count = 0;
        self.sum = 0;
    }

    /// Mean of the last completed window
    pub fn last_mean(&self) -> Option<u16> {
        self.last_mean
    }

    /// Samples in the current partial window
    pub fn pending(&self) -> u8 {
        self.count
    }
}

impl Default for ProximityAverager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_after_full_window() {
        let mut averager = ProximityAverager::new();
        for raw in 100..109 {
            assert_eq!(averager.push(raw), None);
        }
        // 100..=109 averages to 104.5, truncated
        assert_eq!(averager.push(109), Some(104));
        assert_eq!(averager.last_mean(), Some(104));
        assert_eq!(averager.pending(), 0);
    }

    #[test]
    fn windows_do_not_overlap() {
        let mut averager = ProximityAverager::with_window(2);
        assert_eq!(averager.push(10), None);
        assert_eq!(averager.push(20), Some(15));
        assert_eq!(averager.push(1000), None);
        assert_eq!(averager.push(1000), Some(1000));
    }

    #[test]
    fn reset_discards_partial_window() {
        let mut averager = ProximityAverager::with_window(3);
        averager.push(900);
        averager.push(900);
        averager.reset();
        assert_eq!(averager.push(30), None);
        assert_eq!(averager.push(30), None);
        assert_eq!(averager.push(30), Some(30));
    }

    #[test]
    fn zero_window_behaves_as_one() {
        let mut averager = ProximityAverager::with_window(0);
        assert_eq!(averager.push(512), Some(512));
    }
}
