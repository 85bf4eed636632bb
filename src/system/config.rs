//! Calibration and timing constants
//!
//! Everything the motion core needs to know about the robot is fixed at
//! compile time. The constants are grouped by the component that consumes
//! them; [`MotionConfig`] bundles the calibration values so tests can vary
//! them without touching the defaults.

// --- Tick service ---------------------------------------------------------

/// Timer period in microseconds (~5.02 ms)
pub const TICK_PERIOD_US: u32 = 5_018;

/// Tick counter modulus, one full wrap is ~1 s
pub const TICK_MODULUS: u16 = 200;

/// Ticks per fast event (~50 ms)
pub const FAST_TICKS: u16 = 10;

/// Ticks per speed sample (~100 ms)
pub const SPEED_SAMPLE_TICKS: u16 = 20;

/// Ticks per slow analog sample (~250 ms, four samples per second)
pub const SLOW_SAMPLE_TICKS: u16 = 50;

/// Ticks per status report (~1 s)
pub const STATUS_TICKS: u16 = 200;

/// A tick arriving later than this many periods means the timer stopped reloading
pub const HEARTBEAT_TOLERANCE: u32 = 4;

// --- Debounce -------------------------------------------------------------

/// Debounce window in ticks. Two ticks at ~5 ms give 5 to 10 ms of settling,
/// scale it up if the tick period shrinks (10 ticks at 1 ms, for example).
pub const DEBOUNCE_TICKS: u8 = 2;

// --- PWM ------------------------------------------------------------------

/// Resolution of the duty values callers pass in (0..=1023)
pub const DUTY_INPUT_BITS: u8 = 10;

/// Resolution of the compare register actually written
pub const PWM_RESOLUTION_BITS: u8 = 8;

/// Largest accepted duty, in caller resolution
pub const MAX_DUTY: u16 = (1 << DUTY_INPUT_BITS) - 1;

/// Motor PWM carrier frequency
pub const PWM_CARRIER_HZ: u32 = 19_530;

// --- Encoders and speed ---------------------------------------------------

/// Quadrature edges per wheel revolution
pub const TICKS_PER_REVOLUTION: i32 = 48;

/// Wheel circumference in micrometres (2 * pi * 21 mm)
pub const WHEEL_CIRCUMFERENCE_UM: i32 = 131_947;

/// Speed sampling period in milliseconds, must match `SPEED_SAMPLE_TICKS`
pub const SPEED_SAMPLE_PERIOD_MS: i32 = 100;

// --- Proximity sensor -----------------------------------------------------

/// Numerator of the distance fit `K / (raw + offset) - C`
pub const PROXIMITY_K: i32 = 2_914;

/// Raw offset of the distance fit
pub const PROXIMITY_OFFSET: i32 = 5;

/// Constant term of the distance fit, in cm
pub const PROXIMITY_C: i32 = 1;

/// Below this distance (cm) the robot starts slowing down
pub const OBSTACLE_THRESHOLD_CM: i32 = 20;

/// At or below this distance (cm) the robot stops
pub const STOP_DISTANCE_CM: i32 = 4;

/// Number of slow proximity samples averaged into one calibration reading
pub const PROXIMITY_AVERAGE_WINDOW: u8 = 10;

/// Raw reading reported when the ADC fails, the nearest possible obstacle
pub const PROXIMITY_FAILSAFE_RAW: u16 = 1_023;

// --- Decision -------------------------------------------------------------

/// Duty used as "full" by the steering table when the path is clear
pub const CRUISE_DUTY: u16 = 550;

// --- Buzzer ---------------------------------------------------------------

/// Beep length in fast events (~200 ms), sounded at start-up and on every
/// enable/disable toggle
pub const BEEP_FAST_EVENTS: u8 = 4;

// --- Port layout ----------------------------------------------------------

/// Bit of the port snapshot carrying the key level (high = pressed)
pub const KEY_BIT: u8 = 16;

/// Shift of the left encoder's two-bit field in the port snapshot
pub const LEFT_ENCODER_SHIFT: u8 = 6;

/// Shift of the right encoder's two-bit field in the port snapshot
pub const RIGHT_ENCODER_SHIFT: u8 = 8;

/// Calibration values consumed by the decision logic and the speed estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionConfig {
    /// Duty treated as "full" by the steering table
    pub cruise_duty: u16,
    /// Distance below which the duty cap ramps down (cm)
    pub obstacle_threshold_cm: i32,
    /// Distance at which the duty cap reaches zero (cm)
    pub stop_distance_cm: i32,
    /// Distance fit numerator
    pub proximity_k: i32,
    /// Distance fit raw offset
    pub proximity_offset: i32,
    /// Distance fit constant term (cm)
    pub proximity_c: i32,
    /// Encoder edges per wheel revolution
    pub ticks_per_revolution: i32,
    /// Wheel circumference (um)
    pub wheel_circumference_um: i32,
    /// Speed sampling period (ms)
    pub sample_period_ms: i32,
}

impl MotionConfig {
    pub const DEFAULT: Self = Self {
        cruise_duty: CRUISE_DUTY,
        obstacle_threshold_cm: OBSTACLE_THRESHOLD_CM,
        stop_distance_cm: STOP_DISTANCE_CM,
        proximity_k: PROXIMITY_K,
        proximity_offset: PROXIMITY_OFFSET,
        proximity_c: PROXIMITY_C,
        ticks_per_revolution: TICKS_PER_REVOLUTION,
        wheel_circumference_um: WHEEL_CIRCUMFERENCE_UM,
        sample_period_ms: SPEED_SAMPLE_PERIOD_MS,
    };
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_period_matches_tick_cadence() {
        let period_us = SPEED_SAMPLE_TICKS as u32 * TICK_PERIOD_US;
        // 20 ticks of ~5.02 ms land within half a millisecond of 100 ms
        assert!(period_us.abs_diff(SPEED_SAMPLE_PERIOD_MS as u32 * 1_000) < 500);
    }

    #[test]
    fn derived_events_divide_the_modulus() {
        for ticks in [FAST_TICKS, SPEED_SAMPLE_TICKS, SLOW_SAMPLE_TICKS, STATUS_TICKS] {
            assert_eq!(TICK_MODULUS % ticks, 0);
        }
    }

    #[test]
    fn cruise_duty_fits_the_duty_range() {
        assert!(CRUISE_DUTY <= MAX_DUTY);
        assert_eq!(MAX_DUTY, 1023);
    }
}
