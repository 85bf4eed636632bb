//! End-to-end runs of the motion core against fake hardware
//!
//! Interrupts are simulated by calling the shared state's handlers directly,
//! interleaved with control-loop iterations the way the firmware schedules
//! them.

use line_robot::system::config::{
    MotionConfig, BEEP_FAST_EVENTS, DEBOUNCE_TICKS, FAST_TICKS, KEY_BIT, LEFT_ENCODER_SHIFT,
    RIGHT_ENCODER_SHIFT, SPEED_SAMPLE_TICKS,
};
use line_robot::system::control::{ControlLoop, LoopReport};
use line_robot::system::decision::{Color, Steering};
use line_robot::system::fake::{FakePort, FakePwm, FakeSensors};
use line_robot::system::pwm::Channel;
use line_robot::system::quadrature::Wheel;
use line_robot::system::shared::SharedMotionState;

const FAR: u16 = 20;
const AT_15_CM: u16 = 170;
const FORWARD: [u32; 4] = [0b01, 0b11, 0b10, 0b00];

struct Robot {
    shared: SharedMotionState,
    control: ControlLoop<FakeSensors, FakePwm>,
    port: FakePort,
}

impl Robot {
    fn new(line_code: u8, proximity_raw: u16) -> Self {
        let mut control = ControlLoop::new(
            FakeSensors::new(line_code, proximity_raw),
            FakePwm::new(4),
            MotionConfig::DEFAULT,
        );
        control.start();
        Self {
            shared: SharedMotionState::new(),
            control,
            port: FakePort::default(),
        }
    }

    /// Change the pin levels and raise the pin-change interrupt
    fn set_port(&mut self, port: u32) {
        self.port.snapshot = port;
        self.shared.sample_port(&mut self.port);
    }

    fn tick(&mut self) -> LoopReport {
        self.shared.on_timer_tick();
        self.control.step(&self.shared)
    }

    fn press_key(&mut self) {
        self.set_port(self.port.snapshot | 1 << KEY_BIT);
        // contact bounce
        self.set_port(self.port.snapshot & !(1 << KEY_BIT));
        self.set_port(self.port.snapshot | 1 << KEY_BIT);
        for _ in 0..DEBOUNCE_TICKS {
            self.tick();
        }
        self.set_port(self.port.snapshot & !(1 << KEY_BIT));
        for _ in 0..DEBOUNCE_TICKS {
            self.tick();
        }
    }

    /// Both wheels forward by one edge, right encoder mirrored
    fn step_wheels(&mut self, edge: usize) {
        let left = FORWARD[edge % 4];
        let right = FORWARD[(6 - edge % 4) % 4];
        let mask = (0b11 << LEFT_ENCODER_SHIFT) | (0b11 << RIGHT_ENCODER_SHIFT);
        let port =
            (self.port.snapshot & !mask) | left << LEFT_ENCODER_SHIFT | right << RIGHT_ENCODER_SHIFT;
        self.set_port(port);
    }
}

#[test]
fn pwm_starts_after_one_full_period() {
    let robot = Robot::new(2, FAR);
    let output = robot.control.pwm().output();
    assert!(robot.control.pwm().is_running());
    assert!(output.outputs_enabled());
    assert!(output.enabled_after_wrap());
    assert_eq!(output.period_writes(), 1);
    assert_eq!(output.compare(Channel::One), 0);
}

#[test]
fn follows_line_with_obstacle_at_15_cm() {
    let mut robot = Robot::new(2, AT_15_CM);
    robot.press_key();

    let report = robot.control.step(&robot.shared);
    let decision = report.decision.expect("enabled loop decides");
    assert_eq!(decision.steering, Steering::Forward);
    assert_eq!(decision.distance_cm, 15);
    assert_eq!(robot.control.pwm().duty(Channel::One), 378);
    assert_eq!(robot.control.pwm().duty(Channel::Two), 378);
    assert_eq!(robot.control.pwm().output().compare(Channel::One), 378 >> 2);
    assert_eq!(report.indicator, Color::Green);
}

#[test]
fn bouncy_key_toggles_once() {
    let mut robot = Robot::new(2, FAR);
    robot.press_key();
    assert!(robot.control.is_enabled());
    assert_eq!(robot.control.pwm().duty(Channel::One), 550);
}

#[test]
fn disabling_is_a_fail_safe_stop() {
    let mut robot = Robot::new(6, FAR);
    robot.press_key();
    assert_eq!(robot.control.pwm().duty(Channel::One), 550);
    assert_eq!(robot.control.pwm().duty(Channel::Two), 275);

    robot.press_key();
    assert!(!robot.control.is_enabled());
    for _ in 0..50 {
        robot.tick();
    }
    assert_eq!(robot.control.pwm().duty(Channel::One), 0);
    assert_eq!(robot.control.pwm().duty(Channel::Two), 0);
}

#[test]
fn held_key_does_not_retoggle() {
    let mut robot = Robot::new(2, FAR);
    robot.set_port(1 << KEY_BIT);
    for _ in 0..100 {
        robot.tick();
    }
    assert!(robot.control.is_enabled());
}

#[test]
fn speeds_follow_encoder_edges() {
    let mut robot = Robot::new(2, FAR);
    robot.press_key();

    // three edges per tick on both wheels, 60 per speed period
    let mut edge = 0;
    for _ in 0..3 * SPEED_SAMPLE_TICKS {
        for _ in 0..3 {
            robot.step_wheels(edge);
            edge += 1;
        }
        robot.tick();
    }
    // 60 * 131.947 mm / 48 / 0.1 s
    assert_eq!(robot.control.get_speed(Wheel::Left), 1_649);
    assert_eq!(
        robot.control.get_speed(Wheel::Left),
        robot.control.get_speed(Wheel::Right)
    );
    assert_eq!(
        robot.shared.get_position(Wheel::Left),
        robot.shared.get_position(Wheel::Right)
    );
}

#[test]
fn still_wheels_read_zero_speed() {
    let mut robot = Robot::new(0, FAR);
    robot.step_wheels(0);
    for _ in 0..2 * SPEED_SAMPLE_TICKS {
        robot.tick();
    }
    assert_eq!(robot.control.get_speed(Wheel::Left), 0);
    assert_eq!(robot.control.get_speed(Wheel::Right), 0);
}

#[test]
fn lost_line_blinks_debug_led() {
    let mut robot = Robot::new(0, FAR);
    robot.press_key();
    let report = robot.control.step(&robot.shared);
    assert!(report.toggle_debug_led);
    assert_eq!(report.indicator, Color::Off);
    assert_eq!(robot.control.pwm().duty(Channel::One), 275);
    assert_eq!(robot.control.pwm().duty(Channel::Two), 550);
}

#[test]
fn close_obstacle_stops_and_shows_red() {
    let mut robot = Robot::new(2, FAR);
    robot.press_key();
    robot.control.sensors_mut().proximity_raw = 700;
    let report = robot.control.step(&robot.shared);
    assert_eq!(report.indicator, Color::Red);
    assert_eq!(robot.control.pwm().duty(Channel::One), 0);
    assert_eq!(robot.control.pwm().duty(Channel::Two), 0);
}

#[test]
fn beeps_on_start_and_on_each_toggle() {
    let mut robot = Robot::new(2, FAR);
    let beep_ticks = BEEP_FAST_EVENTS as u16 * FAST_TICKS;
    assert!(robot.control.step(&robot.shared).buzzer);
    let mut ticks = 0;
    while robot.tick().buzzer {
        ticks += 1;
    }
    assert_eq!(ticks, beep_ticks - 1);

    for _ in 0..2 {
        robot.press_key();
        assert!(robot.control.step(&robot.shared).buzzer);
        for _ in 0..beep_ticks {
            robot.tick();
        }
        assert!(!robot.control.step(&robot.shared).buzzer);
    }
}
