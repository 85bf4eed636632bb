//! PWM Duty-Cycle Driver
//!
//! Callers talk in 10-bit duties (0..=1023) on two fixed channels. The driver
//! clamps every request into range, drops the low-order bits the compare
//! register cannot hold and writes the result. There is no feedback path.
//!
//! # Channels
//! - Channel 1: left motor
//! - Channel 2: right motor
//!
//! # Start-up
//! The carrier period is programmed once. Outputs stay disabled until the
//! period timer has completed a full cycle, so the first pulse on the motor
//! pins is never a truncated one.

use crate::system::config::{DUTY_INPUT_BITS, MAX_DUTY, PWM_RESOLUTION_BITS};

/// Motor PWM channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel 1, left motor
    One,
    /// Channel 2, right motor
    Two,
}

impl Channel {
    pub const BOTH: [Channel; 2] = [Channel::One, Channel::Two];

    /// Channel number as used by callers (1 or 2)
    pub const fn id(self) -> u8 {
        match self {
            Channel::One => 1,
            Channel::Two => 2,
        }
    }

    const fn index(self) -> usize {
        match self {
            Channel::One => 0,
            Channel::Two => 1,
        }
    }
}

/// A channel number other than 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidChannel(pub u8);

impl TryFrom<u8> for Channel {
    type Error = InvalidChannel;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Channel::One),
            2 => Ok(Channel::Two),
            other => Err(InvalidChannel(other)),
        }
    }
}

/// Duty request for one channel, always within `0..=MAX_DUTY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyCommand {
    pub channel: Channel,
    pub duty: u16,
}

impl DutyCommand {
    /// Clamp `duty` into the accepted range, never rejecting it
    pub fn new(channel: Channel, duty: i32) -> Self {
        Self {
            channel,
            duty: duty.clamp(0, MAX_DUTY as i32) as u16,
        }
    }

    pub const fn stop(channel: Channel) -> Self {
        Self { channel, duty: 0 }
    }

    /// Compare register value for this duty
    pub const fn register_value(&self) -> u16 {
        self.duty >> (DUTY_INPUT_BITS - PWM_RESOLUTION_BITS)
    }
}

/// Register-level access to the motor PWM peripheral
pub trait PwmOutput {
    /// Program the carrier period (`top` is the largest compare value) with
    /// the outputs held inactive
    fn configure_period(&mut self, top: u16);

    /// True once the period timer has wrapped since it was configured
    fn period_elapsed(&mut self) -> bool;

    /// Connect the PWM signals to the motor pins
    fn enable_outputs(&mut self);

    /// Write a compare register
    fn write_compare(&mut self, channel: Channel, value: u16);
}

/// Duty-cycle driver over a [`PwmOutput`]
pub struct PwmDriver<P> {
    output: P,
    duty: [u16; 2],
    running: bool,
}

impl<P: PwmOutput> PwmDriver<P> {
    /// Largest compare register value
    pub const REGISTER_TOP: u16 = (1 << PWM_RESOLUTION_BITS) - 1;

    pub fn new(output: P) -> Self {
        Self {
            output,
            duty: [0; 2],
            running: false,
        }
    }

    /// Program the carrier and enable the outputs after one full period
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        self.output.configure_period(Self::REGISTER_TOP);
        for channel in Channel::BOTH {
            self.output.write_compare(channel, 0);
            self.duty[channel.index()] = 0;
        }

        while !self.output.period_elapsed() {
            core::hint::spin_loop();
        }

        self.output.enable_outputs();
        self.running = true;
        log_info!("PWM carrier running, top {}", Self::REGISTER_TOP);
    }

    /// Clamp, convert and write a duty, returning what was applied
    pub fn set_duty(&mut self, channel: Channel, duty: i32) -> DutyCommand {
        let command = DutyCommand::new(channel, duty);
        self.apply(command);
        command
    }

    /// Write an already clamped command
    pub fn apply(&mut self, command: DutyCommand) {
        self.output
            .write_compare(command.channel, command.register_value());
        self.duty[command.channel.index()] = command.duty;
    }

    /// Zero both channels
    pub fn stop_all(&mut self) {
        for channel in Channel::BOTH {
            self.apply(DutyCommand::stop(channel));
        }
    }

    /// Last duty applied to `channel`, in caller resolution
    pub fn duty(&self, channel: Channel) -> u16 {
        self.duty[channel.index()]
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn output(&self) -> &P {
        &self.output
    }
}
