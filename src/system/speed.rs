//! Wheel Speed Estimator
//!
//! Once per speed period (~100 ms, raised by the tick service) the control
//! loop hands over a copy of both wheel positions. The estimator turns the
//! edge count since the previous sample into a linear speed:
//!
//! ```text
//! speed = delta / ticks_per_revolution * circumference / period
//! ```
//!
//! Everything is integer arithmetic in micrometres and milliseconds, which
//! comes out directly in mm/s. Division truncates toward zero so forward and
//! reverse speeds of the same magnitude stay symmetric.

use crate::system::config::MotionConfig;
use crate::system::quadrature::Wheel;

/// Speeds of both wheels in mm/s, positive is forward
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelSpeeds {
    pub left: i32,
    pub right: i32,
}

impl WheelSpeeds {
    pub fn get(&self, wheel: Wheel) -> i32 {
        match wheel {
            Wheel::Left => self.left,
            Wheel::Right => self.right,
        }
    }
}

/// Convert an edge count over one sample period into mm/s
pub fn linear_speed(delta: i32, config: &MotionConfig) -> i32 {
    let divisor = config.ticks_per_revolution as i64 * config.sample_period_ms as i64;
    if divisor == 0 {
        return 0;
    }
    (delta as i64 * config.wheel_circumference_um as i64 / divisor) as i32
}

/// Per-wheel speed sampling
#[derive(Debug)]
pub struct SpeedEstimator {
    config: MotionConfig,
    previous: [i32; 2],
    speeds: WheelSpeeds,
}

impl SpeedEstimator {
    pub const fn new(config: MotionConfig) -> Self {
        Self {
            config,
            previous: [0; 2],
            speeds: WheelSpeeds { left: 0, right: 0 },
        }
    }

    /// Take one sample of both positions
    ///
    /// Produces a speed for every call, zero when the wheels did not move.
    pub fn sample(&mut self, left_position: i32, right_position: i32) -> WheelSpeeds {
        let left_delta = left_position.wrapping_sub(self.previous[0]);
        let right_delta = right_position.wrapping_sub(self.previous[1]);
        self.previous = [left_position, right_position];

        self.speeds = WheelSpeeds {
            left: linear_speed(left_delta, &self.config),
            right: linear_speed(right_delta, &self.config),
        };
        self.speeds
    }

    /// Latest speed of `wheel` in mm/s
    pub fn speed(&self, wheel: Wheel) -> i32 {
        self.speeds.get(wheel)
    }

    pub fn speeds(&self) -> WheelSpeeds {
        self.speeds
    }
}
