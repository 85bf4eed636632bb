//! Buzzer timing
//!
//! The buzzer acknowledges start-up and every key toggle with a short beep.
//! The control loop never blocks, so a beep is a countdown in fast events
//! (~50 ms each) rather than a delay: the loop requests a beep, then reports
//! the buzzer level on every pass until the countdown runs out.

use crate::system::config::BEEP_FAST_EVENTS;

#[derive(Debug)]
pub struct Beeper {
    length: u8,
    remaining: u8,
}

impl Beeper {
    pub const fn new() -> Self {
        Self::with_length(BEEP_FAST_EVENTS)
    }

    /// Beeper sounding for `length` fast events (at least one)
    pub const fn with_length(length: u8) -> Self {
        Self {
            length: if length == 0 { 1 } else { length },
            remaining: 0,
        }
    }

    /// Start a beep, restarting one already sounding
    pub fn beep(&mut self) {
        self.remaining = self.length;
    }

    /// Count down by the fast events elapsed since the last call
    pub fn advance(&mut self, fast_events: u8) {
        self.remaining = self.remaining.saturating_sub(fast_events);
    }

    /// Buzzer level to drive
    pub fn is_on(&self) -> bool {
        self.remaining > 0
    }
}

impl Default for Beeper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_until_requested() {
        let mut beeper = Beeper::new();
        assert!(!beeper.is_on());
        beeper.advance(10);
        assert!(!beeper.is_on());
    }

    #[test]
    fn beep_lasts_its_length() {
        let mut beeper = Beeper::with_length(4);
        beeper.beep();
        for _ in 0..3 {
            beeper.advance(1);
            assert!(beeper.is_on());
        }
        beeper.advance(1);
        assert!(!beeper.is_on());
    }

    #[test]
    fn missed_events_are_counted_together() {
        let mut beeper = Beeper::with_length(4);
        beeper.beep();
        beeper.advance(3);
        assert!(beeper.is_on());
        beeper.advance(200);
        assert!(!beeper.is_on());
    }

    #[test]
    fn new_beep_restarts_the_countdown() {
        let mut beeper = Beeper::with_length(2);
        beeper.beep();
        beeper.advance(1);
        beeper.beep();
        beeper.advance(1);
        assert!(beeper.is_on());
    }
}
