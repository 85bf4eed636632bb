//! Control Loop
//!
//! One iteration of the thread-mode loop. All interrupt-owned state is read
//! through copies from [`SharedMotionState`]; everything else (speed
//! estimator, averager, enable flag, PWM driver) belongs to the loop alone.
//!
//! # Iteration
//! 1. Consume pending events in one critical section
//! 2. Key press: zero both motors, flip the enable flag and beep
//! 3. Speed period: estimate both wheel speeds from the latched positions
//! 4. Slow period: feed the proximity averager
//! 5. Enabled: read the sensors, decide and apply both duties
//! 6. Status period: report uptime, positions and speeds
//!
//! The loop never blocks, so an iteration is much shorter than a tick and a
//! speed sample is never overwritten before it is consumed.

use crate::system::beeper::Beeper;
use crate::system::config::MotionConfig;
use crate::system::decision::{Color, MotionController, MotionDecision};
use crate::system::port::{SensorPort, SensorSnapshot};
use crate::system::proximity::ProximityAverager;
use crate::system::pwm::{PwmDriver, PwmOutput};
use crate::system::quadrature::Wheel;
use crate::system::shared::{Positions, SharedMotionState};
use crate::system::speed::{SpeedEstimator, WheelSpeeds};

/// Periodic status, emitted once per tick wrap (~1 s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub uptime: u32,
    pub enabled: bool,
    pub positions: Positions,
    pub speeds: WheelSpeeds,
    pub proximity_mean: Option<u16>,
}

/// What one iteration did, for the indicator task and for tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopReport {
    /// The enable flag flipped in this iteration
    pub toggled: bool,
    pub enabled: bool,
    pub decision: Option<MotionDecision>,
    /// Colour to show, [`Color::Off`] while disabled
    pub indicator: Color,
    pub toggle_debug_led: bool,
    /// Buzzer level
    pub buzzer: bool,
    /// New speeds, when a speed sample was consumed
    pub speeds: Option<WheelSpeeds>,
    /// New proximity mean, when a window completed
    pub proximity_mean: Option<u16>,
    pub status: Option<StatusReport>,
}

/// Thread-mode motion control over a sensor port and a PWM peripheral
pub struct ControlLoop<S, P> {
    sensors: S,
    pwm: PwmDriver<P>,
    controller: MotionController,
    speed: SpeedEstimator,
    averager: ProximityAverager,
    beeper: Beeper,
}

impl<S: SensorPort, P: PwmOutput> ControlLoop<S, P> {
    /// A disabled loop; call [`ControlLoop::start`] before the first step
    pub fn new(sensors: S, pwm_output: P, config: MotionConfig) -> Self {
        Self {
            sensors,
            pwm: PwmDriver::new(pwm_output),
            controller: MotionController::new(config),
            speed: SpeedEstimator::new(config),
            averager: ProximityAverager::new(),
            beeper: Beeper::new(),
        }
    }

    /// Bring up the PWM carrier with both motors at zero and beep once
    pub fn start(&mut self) {
        self.pwm.start();
        self.beeper.beep();
        log_info!(
            "Control loop ready, cruise duty {}",
            self.controller.config().cruise_duty
        );
    }

    /// Run one iteration against the interrupt-shared state
    pub fn step(&mut self, shared: &SharedMotionState) -> LoopReport {
        let events = shared.take_events();
        self.beeper.advance(events.fast_events);

        let toggled = events.key_pressed;
        if toggled {
            for stop in self.controller.toggle() {
                self.pwm.apply(stop);
            }
            self.averager.reset();
            self.beeper.beep();
            if self.controller.is_enabled() {
                log_info!("Key press: motion enabled");
            } else {
                log_info!("Key press: motion disabled");
            }
        }

        let speeds = events.speed_sample.map(|positions| {
            let speeds = self.speed.sample(positions.left, positions.right);
            log_debug!("Speed left {} mm/s right {} mm/s", speeds.left, speeds.right);
            speeds
        });

        let proximity_mean = if events.slow_sample {
            let raw = self.sensors.read_proximity();
            let mean = self.averager.push(raw);
            if let Some(mean) = mean {
                log_info!("Proximity mean {}", mean);
            }
            mean
        } else {
            None
        };

        let decision = if self.controller.is_enabled() {
            let snapshot = SensorSnapshot::read(&mut self.sensors);
            self.controller.step(snapshot)
        } else {
            None
        };
        if let Some(decision) = decision {
            self.pwm.apply(decision.left);
            self.pwm.apply(decision.right);
        }

        let status = events.status.then(|| {
            let report = StatusReport {
                uptime: events.uptime,
                enabled: self.controller.is_enabled(),
                positions: shared.positions(),
                speeds: self.speed.speeds(),
                proximity_mean: self.averager.last_mean(),
            };
            log_info!(
                "Status: uptime {} enabled {} position {} {} speed {} {}",
                report.uptime,
                report.enabled,
                report.positions.left,
                report.positions.right,
                report.speeds.left,
                report.speeds.right
            );
            report
        });

        LoopReport {
            toggled,
            enabled: self.controller.is_enabled(),
            decision,
            indicator: decision.map_or(Color::Off, |d| d.indicator),
            toggle_debug_led: decision.is_some_and(|d| d.toggle_debug_led),
            buzzer: self.beeper.is_on(),
            speeds,
            proximity_mean,
            status,
        }
    }

    /// Latest speed of `wheel` in mm/s
    pub fn get_speed(&self, wheel: Wheel) -> i32 {
        self.speed.speed(wheel)
    }

    pub fn is_enabled(&self) -> bool {
        self.controller.is_enabled()
    }

    pub fn pwm(&self) -> &PwmDriver<P> {
        &self.pwm
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }
}
