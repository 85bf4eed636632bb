//! Motion Decision Logic
//!
//! Converts one [`SensorSnapshot`] into duties for both wheels.
//!
//! # Steering
//! The three line sensors form a code with the right sensor on bit 2, the
//! center on bit 1 and the left on bit 0:
//!
//! | line code | left  | right | meaning               |
//! |-----------|-------|-------|-----------------------|
//! | 2, 7      | full  | full  | on the line           |
//! | 4, 6      | full  | half  | line to the right     |
//! | 1, 3      | half  | full  | line to the left      |
//! | other     | half  | full  | line lost, circle     |
//!
//! # Speed cap
//! "Full" is the cruise duty scaled by the proximity distance: unchanged at
//! or beyond the obstacle threshold, falling linearly to zero at the stop
//! distance.

use crate::system::config::MotionConfig;
use crate::system::port::SensorSnapshot;
use crate::system::pwm::{Channel, DutyCommand};

/// Distance in cm from a raw proximity reading, `K / (raw + offset) - C`
pub fn proximity_distance_cm(raw: u16, config: &MotionConfig) -> i32 {
    let denominator = raw as i32 + config.proximity_offset;
    if denominator <= 0 {
        return 0;
    }
    (config.proximity_k / denominator - config.proximity_c).max(0)
}

/// Duty used as "full" at `distance_cm`
pub fn speed_cap(distance_cm: i32, config: &MotionConfig) -> u16 {
    let cruise = config.cruise_duty as i32;
    if distance_cm >= config.obstacle_threshold_cm {
        return config.cruise_duty;
    }
    if distance_cm <= config.stop_distance_cm {
        return 0;
    }
    let span = config.obstacle_threshold_cm - config.stop_distance_cm;
    (cruise * (distance_cm - config.stop_distance_cm) / span) as u16
}

/// Steering branch picked from the line code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Steering {
    /// Line under the center, drive straight
    Forward,
    /// Line under the right sensor
    TurnRight,
    /// Line under the left sensor
    TurnLeft,
    /// Line lost, circle until it shows up again
    Searching,
}

impl Steering {
    pub fn from_line_code(line_code: u8) -> Self {
        match line_code {
            2 | 7 => Steering::Forward,
            4 | 6 => Steering::TurnRight,
            1 | 3 => Steering::TurnLeft,
            _ => Steering::Searching,
        }
    }

    /// Left and right duty for a given cap
    pub fn duties(self, cap: u16) -> (u16, u16) {
        let half = (5 * cap as u32 / 10) as u16;
        match self {
            Steering::Forward => (cap, cap),
            Steering::TurnRight => (cap, half),
            Steering::TurnLeft | Steering::Searching => (half, cap),
        }
    }
}

/// RGB indicator colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Off,
    Red,
    Green,
    Blue,
    Magenta,
}

/// Everything one control-loop iteration decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionDecision {
    pub steering: Steering,
    pub distance_cm: i32,
    pub cap: u16,
    pub left: DutyCommand,
    pub right: DutyCommand,
    pub indicator: Color,
    /// Blink the debug LED, set every iteration while searching
    pub toggle_debug_led: bool,
}

/// Decide both wheel duties from one sensor snapshot
pub fn decide(snapshot: SensorSnapshot, config: &MotionConfig) -> MotionDecision {
    let steering = Steering::from_line_code(snapshot.line_code);
    let distance_cm = proximity_distance_cm(snapshot.proximity_raw, config);
    let cap = speed_cap(distance_cm, config);
    let (left, right) = steering.duties(cap);

    let indicator = if cap == 0 {
        Color::Red
    } else {
        match steering {
            Steering::Forward => Color::Green,
            Steering::TurnRight => Color::Blue,
            Steering::TurnLeft => Color::Magenta,
            Steering::Searching => Color::Off,
        }
    };

    MotionDecision {
        steering,
        distance_cm,
        cap,
        left: DutyCommand::new(Channel::One, left as i32),
        right: DutyCommand::new(Channel::Two, right as i32),
        indicator,
        toggle_debug_led: steering == Steering::Searching,
    }
}

/// Enable flag of the robot, flipped by key presses
#[derive(Debug)]
pub struct MotionController {
    config: MotionConfig,
    enabled: bool,
}

impl MotionController {
    /// A controller that starts disabled
    pub const fn new(config: MotionConfig) -> Self {
        Self {
            config,
            enabled: false,
        }
    }

    /// Flip the enable flag
    ///
    /// Returns the stop commands that must reach both motors before the new
    /// mode takes effect.
    pub fn toggle(&mut self) -> [DutyCommand; 2] {
        self.enabled = !self.enabled;
        Channel::BOTH.map(DutyCommand::stop)
    }

    /// Decision for this iteration, `None` while disabled
    pub fn step(&self, snapshot: SensorSnapshot) -> Option<MotionDecision> {
        self.enabled.then(|| decide(snapshot, &self.config))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }
}
