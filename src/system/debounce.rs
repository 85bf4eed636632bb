//! Key Debounce State Machine
//!
//! Turns the bouncing level of the board key into one clean press event.
//! The machine is only ever driven from the two interrupt paths:
//! - pin change: the raw level moved, restart the settling countdown
//! - tick: count down, and promote the raw level once it has held still
//!
//! With a window of N ticks the stable level follows the raw level on the
//! Nth tick after the last raw change, so at ~5 ms ticks and N = 2 the key
//! settles within 5 to 10 ms.
//!
//! The main loop only consumes the press latch through [`Debouncer::key_pressed`].

use crate::system::config::DEBOUNCE_TICKS;

/// Debounce phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebouncePhase {
    /// Stable and released
    Idle,
    /// Raw level changed recently, ticks left before it is trusted
    Bouncing(u8),
    /// Stable and pressed
    Pressed,
}

/// Debouncer for a single active-high input
#[derive(Debug)]
pub struct Debouncer {
    raw_level: bool,
    stable_level: bool,
    window: u8,
    phase: DebouncePhase,
    /// Set on a confirmed press edge, cleared when consumed
    press_latched: bool,
}

impl Debouncer {
    /// Debouncer with the default window
    pub const fn new() -> Self {
        Self::with_window(DEBOUNCE_TICKS)
    }

    /// Debouncer settling after `window` quiet ticks (at least one)
    pub const fn with_window(window: u8) -> Self {
        Self {
            raw_level: false,
            stable_level: false,
            window: if window == 0 { 1 } else { window },
            phase: DebouncePhase::Idle,
            press_latched: false,
        }
    }

    /// Raw level seen by the pin-change handler
    ///
    /// Port-change interrupts also fire for the other pins on the port, so a
    /// level equal to the last raw level is not a key event and is ignored.
    pub fn on_pin_change(&mut self, level: bool) {
        if level == self.raw_level {
            return;
        }
        self.raw_level = level;
        self.phase = DebouncePhase::Bouncing(self.window);
    }

    /// Advance the countdown by one tick
    pub fn on_tick(&mut self) {
        let DebouncePhase::Bouncing(count) = self.phase else {
            return;
        };

        let count = count - 1;
        if count > 0 {
            self.phase = DebouncePhase::Bouncing(count);
            return;
        }

        let was_pressed = self.stable_level;
        self.stable_level = self.raw_level;
        if self.stable_level {
            self.phase = DebouncePhase::Pressed;
            if !was_pressed {
                self.press_latched = true;
            }
        } else {
            self.phase = DebouncePhase::Idle;
        }
    }

    /// True exactly once per confirmed press edge
    ///
    /// A new press can only be latched after the stable level has gone back
    /// to released, so holding the key never fires twice.
    pub fn key_pressed(&mut self) -> bool {
        core::mem::take(&mut self.press_latched)
    }

    /// Debounced level
    pub fn stable_level(&self) -> bool {
        self.stable_level
    }

    /// Last raw level
    pub fn raw_level(&self) -> bool {
        self.raw_level
    }

    pub fn phase(&self) -> DebouncePhase {
        self.phase
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(debouncer: &mut Debouncer, ticks: u8) {
        for _ in 0..ticks {
            debouncer.on_tick();
        }
    }

    #[test]
    fn starts_idle_and_released() {
        let debouncer = Debouncer::new();
        assert_eq!(debouncer.phase(), DebouncePhase::Idle);
        assert!(!debouncer.stable_level());
    }

    #[test]
    fn stable_level_follows_on_nth_tick() {
        for window in 1..=5u8 {
            let mut debouncer = Debouncer::with_window(window);
            debouncer.on_pin_change(true);
            for _ in 0..window - 1 {
                debouncer.on_tick();
                assert!(!debouncer.stable_level(), "window {window} promoted early");
            }
            debouncer.on_tick();
            assert!(debouncer.stable_level());
            assert_eq!(debouncer.phase(), DebouncePhase::Pressed);

            // further ticks leave the level alone
            settle(&mut debouncer, 10);
            assert!(debouncer.stable_level());
        }
    }

    #[test]
    fn bounce_restarts_countdown() {
        let mut debouncer = Debouncer::new();
        debouncer.on_pin_change(true);
        debouncer.on_tick();
        debouncer.on_pin_change(false);
        debouncer.on_pin_change(true);
        assert_eq!(debouncer.phase(), DebouncePhase::Bouncing(DEBOUNCE_TICKS));
        debouncer.on_tick();
        assert!(!debouncer.stable_level());
        debouncer.on_tick();
        assert!(debouncer.stable_level());
    }

    #[test]
    fn bounce_back_to_released_is_no_press() {
        let mut debouncer = Debouncer::new();
        debouncer.on_pin_change(true);
        debouncer.on_pin_change(false);
        settle(&mut debouncer, 5);
        assert_eq!(debouncer.phase(), DebouncePhase::Idle);
        assert!(!debouncer.key_pressed());
    }

    #[test]
    fn repeated_level_is_not_an_event() {
        let mut debouncer = Debouncer::new();
        debouncer.on_pin_change(false);
        assert_eq!(debouncer.phase(), DebouncePhase::Idle);
    }

    #[test]
    fn press_fires_once_per_cycle() {
        let mut debouncer = Debouncer::new();

        debouncer.on_pin_change(true);
        settle(&mut debouncer, DEBOUNCE_TICKS);
        assert!(debouncer.key_pressed());
        assert!(!debouncer.key_pressed());

        // holding the key does not re-trigger
        settle(&mut debouncer, 50);
        assert!(!debouncer.key_pressed());

        debouncer.on_pin_change(false);
        settle(&mut debouncer, DEBOUNCE_TICKS);
        assert!(!debouncer.key_pressed());

        debouncer.on_pin_change(true);
        settle(&mut debouncer, DEBOUNCE_TICKS);
        assert!(debouncer.key_pressed());
        assert!(!debouncer.key_pressed());
    }

    #[test]
    fn unconfirmed_release_does_not_rearm() {
        let mut debouncer = Debouncer::new();
        debouncer.on_pin_change(true);
        settle(&mut debouncer, DEBOUNCE_TICKS);
        assert!(debouncer.key_pressed());

        // a short glitch low never settles
        debouncer.on_pin_change(false);
        debouncer.on_pin_change(true);
        settle(&mut debouncer, DEBOUNCE_TICKS);
        assert!(!debouncer.key_pressed());
    }

    #[test]
    fn zero_window_settles_after_one_tick() {
        let mut debouncer = Debouncer::with_window(0);
        debouncer.on_pin_change(true);
        debouncer.on_tick();
        assert!(debouncer.stable_level());
    }
}
