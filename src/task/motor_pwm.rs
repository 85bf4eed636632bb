//! Motor PWM backend
//!
//! Register-level [`PwmOutput`] on two RP2350 PWM slices.
//!
//! # Hardware Configuration
//! - Channel 1 (left motor): slice 6, output A on GPIO 28
//! - Channel 2 (right motor): slice 5, output B on GPIO 27
//! - Direction pins are driven forward once and never change
//! - The driver's standby pin holds both bridges off until
//!   [`PwmOutput::enable_outputs`]
//!
//! The slices count up to `top` with a divider chosen for a carrier close to
//! [`PWM_CARRIER_HZ`].

use defmt::debug;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pwm::{Config, Pwm};
use line_robot::system::config::PWM_CARRIER_HZ;
use line_robot::system::pwm::{Channel, PwmOutput};

use crate::task::resources::MotorDriverResources;

/// Both motor PWM slices and the driver control pins
pub struct MotorPwm {
    left: Pwm<'static>,
    right: Pwm<'static>,
    left_config: Config,
    right_config: Config,
    standby: Output<'static>,
    /// Held for their fixed forward levels
    _direction: [Output<'static>; 4],
}

impl MotorPwm {
    /// Claim the motor pins with the slices stopped and the driver in standby
    pub fn new(r: MotorDriverResources) -> Self {
        let standby = Output::new(r.standby_pin, Level::Low);
        let direction = [
            Output::new(r.left_forward_pin, Level::High),
            Output::new(r.left_backward_pin, Level::Low),
            Output::new(r.right_forward_pin, Level::High),
            Output::new(r.right_backward_pin, Level::Low),
        ];

        let mut left_config = Config::default();
        left_config.enable = false;
        left_config.compare_a = 0;
        let mut right_config = Config::default();
        right_config.enable = false;
        right_config.compare_b = 0;

        let left = Pwm::new_output_a(r.left_slice, r.left_pwm_pin, left_config.clone());
        let right = Pwm::new_output_b(r.right_slice, r.right_pwm_pin, right_config.clone());

        Self {
            left,
            right,
            left_config,
            right_config,
            standby,
            _direction: direction,
        }
    }
}

impl PwmOutput for MotorPwm {
    fn configure_period(&mut self, top: u16) {
        let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();
        let divider = (clock_freq_hz / (PWM_CARRIER_HZ * (top as u32 + 1))).clamp(1, 255) as u8;
        debug!(
            "Motor PWM: clk {} Hz, divider {}, top {}",
            clock_freq_hz, divider, top
        );

        for config in [&mut self.left_config, &mut self.right_config] {
            config.divider = divider.into();
            config.top = top;
            config.enable = true;
        }
        self.left.set_config(&self.left_config);
        self.right.set_config(&self.right_config);
        self.left.clear_wrapped();
    }

    fn period_elapsed(&mut self) -> bool {
        self.left.wrapped()
    }

    fn enable_outputs(&mut self) {
        self.standby.set_high();
    }

    fn write_compare(&mut self, channel: Channel, value: u16) {
        match channel {
            Channel::One => {
                self.left_config.compare_a = value;
                self.left.set_config(&self.left_config);
            }
            Channel::Two => {
                self.right_config.compare_b = value;
                self.right.set_config(&self.right_config);
            }
        }
    }
}
