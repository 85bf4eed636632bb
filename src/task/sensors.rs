//! Sensor and port backends
//!
//! [`SensorPort`] over three GPIO line sensors and a blocking ADC read, and
//! [`PortSnapshot`] over the SIO input register.

use defmt::warn;
use embassy_rp::adc::{self, Adc, Blocking};
use embassy_rp::gpio::{Input, Pull};
use line_robot::system::config::PROXIMITY_FAILSAFE_RAW;
use line_robot::system::port::{PortSnapshot, SensorPort};

use crate::task::resources::SensorResources;

/// The RP2350 ADC is 12-bit, the proximity formula expects 10 bits
const ADC_TO_PROXIMITY_SHIFT: u8 = 2;

/// Line sensors and the proximity ADC channel
pub struct RobotSensors {
    line_left: Input<'static>,
    line_center: Input<'static>,
    line_right: Input<'static>,
    adc: Adc<'static, Blocking>,
    proximity: adc::Channel<'static>,
}

impl RobotSensors {
    pub fn new(r: SensorResources) -> Self {
        Self {
            line_left: Input::new(r.line_left, Pull::None),
            line_center: Input::new(r.line_center, Pull::None),
            line_right: Input::new(r.line_right, Pull::None),
            adc: Adc::new_blocking(r.adc, adc::Config::default()),
            proximity: adc::Channel::new_pin(r.proximity_pin, Pull::None),
        }
    }
}

impl SensorPort for RobotSensors {
    fn read_line_sensor(&mut self) -> u8 {
        (self.line_right.is_high() as u8) << 2
            | (self.line_center.is_high() as u8) << 1
            | self.line_left.is_high() as u8
    }

    fn read_proximity(&mut self) -> u16 {
        match self.adc.blocking_read(&mut self.proximity) {
            Ok(raw) => raw >> ADC_TO_PROXIMITY_SHIFT,
            Err(e) => {
                // treat as an obstacle right in front
                warn!("Proximity read failed: {:?}", e);
                PROXIMITY_FAILSAFE_RAW
            }
        }
    }
}

/// GPIO bank 0 input levels in one register read
pub struct SioPort;

impl PortSnapshot for SioPort {
    fn read_port_snapshot(&mut self) -> u32 {
        embassy_rp::pac::SIO.gpio_in(0).read()
    }
}
