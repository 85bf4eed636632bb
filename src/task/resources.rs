//! Hardware Resource Management
//!
//! Allocates the RP2350 pins and peripherals to the firmware tasks. Every group
//! is owned by exactly one task, so nothing here is shared at runtime.
//!
//! # Resource Groups
//! - Port inputs: both quadrature encoders and the start/stop key
//! - Motor driver: two PWM slices, fixed direction pins and the standby pin
//! - Sensors: three line sensor inputs and the proximity ADC channel
//! - Indicators: RGB LED, the debug LED and the buzzer
//!
//! # Port Layout
//! The encoder and key pins sit on GPIO bank 0 at the bit positions the
//! motion core expects in a port snapshot: left encoder on bits 6-7, right
//! encoder on bits 8-9, key on bit 16.

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
    /// Encoder channels and the key, all read from one port snapshot
    port_inputs: PortInputResources {
        left_encoder_a: PIN_6,
        left_encoder_b: PIN_7,
        right_encoder_a: PIN_8,
        right_encoder_b: PIN_9,
        key: PIN_16,
    },
    /// Dual H-bridge motor driver
    motor_driver: MotorDriverResources {
        standby_pin: PIN_22,
        // Channel 1, left motor
        left_slice: PWM_SLICE6,
        left_pwm_pin: PIN_28,
        left_forward_pin: PIN_21,
        left_backward_pin: PIN_20,
        // Channel 2, right motor
        right_slice: PWM_SLICE5,
        right_pwm_pin: PIN_27,
        right_forward_pin: PIN_19,
        right_backward_pin: PIN_18,
    },
    /// Line sensors and the analog proximity sensor
    sensors: SensorResources {
        line_left: PIN_10,
        line_center: PIN_11,
        line_right: PIN_12,
        adc: ADC,
        proximity_pin: PIN_26,
    },
    /// RGB indicator and on-board debug LED
    indicators: IndicatorResources {
        red_pin: PIN_2,
        green_pin: PIN_3,
        blue_pin: PIN_4,
        debug_led: PIN_25,
        buzzer_pin: PIN_15,
    },
}
