//! Control loop task
//!
//! Thread-mode loop that never blocks: each pass runs one [`ControlLoop`]
//! iteration, updates the indicators and the buzzer and yields so the executor can poll the
//! rest of the thread-mode tasks. The tick and port tasks preempt it from
//! the interrupt executor.

use defmt::info;
use embassy_futures::yield_now;
use line_robot::system::config::MotionConfig;
use line_robot::system::control::ControlLoop;
use line_robot::system::shared::MOTION_STATE;

use crate::task::indicator::Indicators;
use crate::task::motor_pwm::MotorPwm;
use crate::task::resources::{IndicatorResources, MotorDriverResources, SensorResources};
use crate::task::sensors::RobotSensors;

#[embassy_executor::task]
pub async fn control(
    motor: MotorDriverResources,
    sensors: SensorResources,
    indicators: IndicatorResources,
) {
    let mut control = ControlLoop::new(
        RobotSensors::new(sensors),
        MotorPwm::new(motor),
        MotionConfig::DEFAULT,
    );
    let mut indicators = Indicators::new(indicators);

    control.start();
    info!("Waiting for key press");

    loop {
        let report = control.step(&MOTION_STATE);

        indicators.show(report.indicator);
        if report.toggle_debug_led {
            indicators.toggle_debug_led();
        }
        indicators.set_buzzer(report.buzzer);

        yield_now().await;
    }
}
