//! Fake hardware for host tests
//!
//! Stand-ins for the hardware ports that record what the core did to them.

use crate::system::port::{PortSnapshot, SensorPort};
use crate::system::pwm::{Channel, PwmOutput};

/// Sensors returning whatever the test put in
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeSensors {
    pub line_code: u8,
    pub proximity_raw: u16,
    /// Number of line sensor reads so far
    pub reads: u32,
}

impl FakeSensors {
    pub fn new(line_code: u8, proximity_raw: u16) -> Self {
        Self {
            line_code,
            proximity_raw,
            reads: 0,
        }
    }
}

impl SensorPort for FakeSensors {
    fn read_line_sensor(&mut self) -> u8 {
        self.reads += 1;
        self.line_code
    }

    fn read_proximity(&mut self) -> u16 {
        self.proximity_raw
    }
}

/// Port returning a fixed snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct FakePort {
    pub snapshot: u32,
}

impl PortSnapshot for FakePort {
    fn read_port_snapshot(&mut self) -> u32 {
        self.snapshot
    }
}

/// PWM peripheral whose period timer wraps after a number of polls
#[derive(Debug, Clone)]
pub struct FakePwm {
    polls_per_period: u32,
    polls: u32,
    top: Option<u16>,
    compare: [u16; 2],
    outputs_enabled: bool,
    enabled_after_wrap: bool,
    period_writes: u32,
}

impl FakePwm {
    /// A timer that wraps on the `polls_per_period`th poll after configuration
    pub fn new(polls_per_period: u32) -> Self {
        Self {
            polls_per_period: polls_per_period.max(1),
            polls: 0,
            top: None,
            compare: [0; 2],
            outputs_enabled: false,
            enabled_after_wrap: false,
            period_writes: 0,
        }
    }

    fn wrapped(&self) -> bool {
        self.top.is_some() && self.polls >= self.polls_per_period
    }

    pub fn compare(&self, channel: Channel) -> u16 {
        match channel {
            Channel::One => self.compare[0],
            Channel::Two => self.compare[1],
        }
    }

    pub fn top(&self) -> Option<u16> {
        self.top
    }

    pub fn outputs_enabled(&self) -> bool {
        self.outputs_enabled
    }

    /// True if the outputs were enabled only after the first wrap
    pub fn enabled_after_wrap(&self) -> bool {
        self.enabled_after_wrap
    }

    pub fn period_writes(&self) -> u32 {
        self.period_writes
    }
}

impl PwmOutput for FakePwm {
    fn configure_period(&mut self, top: u16) {
        self.top = Some(top);
        self.polls = 0;
        self.period_writes += 1;
    }

    fn period_elapsed(&mut self) -> bool {
        if self.top.is_some() {
            self.polls += 1;
        }
        self.wrapped()
    }

    fn enable_outputs(&mut self) {
        self.enabled_after_wrap = self.wrapped();
        self.outputs_enabled = true;
    }

    fn write_compare(&mut self, channel: Channel, value: u16) {
        let top = self.top.unwrap_or(u16::MAX);
        let value = value.min(top);
        match channel {
            Channel::One => self.compare[0] = value,
            Channel::Two => self.compare[1] = value,
        }
    }
}
