//! Periodic Tick Service
//!
//! The timer fires every [`TICK_PERIOD_US`](crate::system::config::TICK_PERIOD_US)
//! and everything time-related in the core is derived from it. The service
//! owns its counter and reports which lower-frequency events fall on the
//! current tick.
//!
//! # Derived events
//! - every tick: debounce countdown
//! - ~50 ms: fast event (buzzer timing)
//! - ~100 ms: speed sample
//! - ~250 ms: slow analog sample
//! - ~1 s: status report (one full wrap of the counter)

use crate::system::config::{
    FAST_TICKS, HEARTBEAT_TOLERANCE, SLOW_SAMPLE_TICKS, SPEED_SAMPLE_TICKS, STATUS_TICKS,
    TICK_MODULUS, TICK_PERIOD_US,
};

/// Lower-frequency events falling on a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickEvents {
    /// ~50 ms boundary
    pub fast: bool,
    /// ~100 ms boundary, time to sample wheel positions
    pub speed_sample: bool,
    /// ~250 ms boundary, time for a slow analog sample
    pub slow_sample: bool,
    /// ~1 s boundary
    pub status: bool,
}

/// Owner of the tick counter
#[derive(Debug)]
pub struct TickService {
    /// Wrapping counter, `0..modulus`
    count: u16,
    modulus: u16,
    /// Ticks since boot, wraps after ~248 days
    uptime: u32,
}

impl TickService {
    /// Create a service with the default modulus
    pub const fn new() -> Self {
        Self::with_modulus(TICK_MODULUS)
    }

    /// Create a service wrapping at `modulus` ticks
    pub const fn with_modulus(modulus: u16) -> Self {
        Self {
            count: 0,
            modulus: if modulus == 0 { 1 } else { modulus },
            uptime: 0,
        }
    }

    /// Advance by one timer period and report the events due on this tick
    pub fn on_tick(&mut self) -> TickEvents {
        self.uptime = self.uptime.wrapping_add(1);
        self.count += 1;
        if self.count >= self.modulus {
            self.count = 0;
        }

        TickEvents {
            fast: self.count % FAST_TICKS == 0,
            speed_sample: self.count % SPEED_SAMPLE_TICKS == 0,
            slow_sample: self.count % SLOW_SAMPLE_TICKS == 0,
            status: self.count % STATUS_TICKS == 0,
        }
    }

    /// Current position within the modulus
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Ticks since boot
    pub fn uptime(&self) -> u32 {
        self.uptime
    }
}

impl Default for TickService {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick service failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickError {
    /// The timer did not reload in time and the period guarantee is gone
    HeartbeatLost { elapsed_us: u32 },
}

/// Watches the real interval between ticks
///
/// There is no recovery: a late tick means the timer is free-running and the
/// caller must treat it as fatal.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatMonitor {
    limit_us: u32,
}

impl HeartbeatMonitor {
    pub const fn new() -> Self {
        Self::with_limit(TICK_PERIOD_US * HEARTBEAT_TOLERANCE)
    }

    pub const fn with_limit(limit_us: u32) -> Self {
        Self { limit_us }
    }

    /// Check the time elapsed since the previous tick
    pub fn check(&self, elapsed_us: u32) -> Result<(), TickError> {
        if elapsed_us > self.limit_us {
            log_error!("heartbeat lost: {} us since last tick", elapsed_us);
            return Err(TickError::HeartbeatLost { elapsed_us });
        }
        Ok(())
    }
}

impl Default for HeartbeatMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_wraps_at_modulus() {
        let mut tick = TickService::new();
        for _ in 0..TICK_MODULUS - 1 {
            tick.on_tick();
        }
        assert_eq!(tick.count(), TICK_MODULUS - 1);
        tick.on_tick();
        assert_eq!(tick.count(), 0);
        assert_eq!(tick.uptime(), TICK_MODULUS as u32);
    }

    #[test]
    fn speed_sample_every_hundred_milliseconds() {
        let mut tick = TickService::new();
        let due: Vec<u32> = (1..=100u32)
            .filter(|_| tick.on_tick().speed_sample)
            .collect();
        assert_eq!(due, vec![20, 40, 60, 80, 100]);
    }

    #[test]
    fn one_second_event_per_wrap() {
        let mut tick = TickService::new();
        let status = (0..(TICK_MODULUS as u32 * 3))
            .filter(|_| tick.on_tick().status)
            .count();
        assert_eq!(status, 3);
    }

    #[test]
    fn slow_samples_four_per_second() {
        let mut tick = TickService::new();
        let slow = (0..TICK_MODULUS).filter(|_| tick.on_tick().slow_sample).count();
        assert_eq!(slow, 4);
    }

    #[test]
    fn fast_events_twenty_per_second() {
        let mut tick = TickService::new();
        let fast = (0..TICK_MODULUS).filter(|_| tick.on_tick().fast).count();
        assert_eq!(fast, 20);
    }

    #[test]
    fn zero_modulus_is_treated_as_one() {
        let mut tick = TickService::with_modulus(0);
        assert!(tick.on_tick().status);
        assert_eq!(tick.count(), 0);
    }

    #[test]
    fn heartbeat_within_tolerance() {
        let monitor = HeartbeatMonitor::new();
        assert_eq!(monitor.check(TICK_PERIOD_US), Ok(()));
        assert_eq!(monitor.check(TICK_PERIOD_US * HEARTBEAT_TOLERANCE), Ok(()));
    }

    #[test]
    fn late_tick_is_reported() {
        let monitor = HeartbeatMonitor::with_limit(10_000);
        assert_eq!(
            monitor.check(10_001),
            Err(TickError::HeartbeatLost { elapsed_us: 10_001 })
        );
    }
}
