//! RGB LED, debug LED and buzzer
//!
//! Driven from the control loop with the colour of each decision and the
//! buzzer level. The LED is only rewritten when the colour changes.

use embassy_rp::gpio::{Level, Output};
use line_robot::system::decision::Color;

use crate::task::resources::IndicatorResources;

pub struct Indicators {
    red: Output<'static>,
    green: Output<'static>,
    blue: Output<'static>,
    debug_led: Output<'static>,
    buzzer: Output<'static>,
    shown: Color,
}

impl Indicators {
    pub fn new(r: IndicatorResources) -> Self {
        Self {
            red: Output::new(r.red_pin, Level::Low),
            green: Output::new(r.green_pin, Level::Low),
            blue: Output::new(r.blue_pin, Level::Low),
            debug_led: Output::new(r.debug_led, Level::Low),
            buzzer: Output::new(r.buzzer_pin, Level::Low),
            shown: Color::Off,
        }
    }

    pub fn show(&mut self, color: Color) {
        if color == self.shown {
            return;
        }
        let (red, green, blue) = match color {
            Color::Off => (false, false, false),
            Color::Red => (true, false, false),
            Color::Green => (false, true, false),
            Color::Blue => (false, false, true),
            Color::Magenta => (true, false, true),
        };
        self.red.set_level(red.into());
        self.green.set_level(green.into());
        self.blue.set_level(blue.into());
        self.shown = color;
    }

    pub fn toggle_debug_led(&mut self) {
        self.debug_led.toggle();
    }

    pub fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set_level(on.into());
    }
}
