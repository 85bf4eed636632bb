//! Quadrature Encoder Decoder
//!
//! Each wheel carries a two-channel encoder whose channels form a two-bit
//! gray code. Every pin change on the encoder port looks up the transition
//! `(previous, current)` in [`DECODE_TABLE`] and adds the result to the
//! wheel's position.
//!
//! # Transitions
//! Forward rotation walks `00 -> 01 -> 11 -> 10 -> 00`, backward walks the
//! same ring the other way. Repeats (`prev == cur`, the interrupt fired for
//! the other wheel) and diagonals (both bits flipped, an edge was missed)
//! decode to 0 so an interrupt storm can never produce a jump of two.
//!
//! Two real transitions inside one electrical bounce still alias to a single
//! step. That is a limitation of edge-driven decoding and is not corrected
//! here. A change that lands after a snapshot but before the edge wait is
//! armed again is a different case: the port task re-reads the port once the
//! wait is armed and handles the change at once.

use crate::system::config::{LEFT_ENCODER_SHIFT, RIGHT_ENCODER_SHIFT};

/// Two-bit encoder state, `B A`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QuadState {
    S00 = 0b00,
    S01 = 0b01,
    S10 = 0b10,
    S11 = 0b11,
}

impl QuadState {
    /// All states in table order
    pub const ALL: [QuadState; 4] = [Self::S00, Self::S01, Self::S10, Self::S11];

    /// State from the two low bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::S00,
            0b01 => Self::S01,
            0b10 => Self::S10,
            _ => Self::S11,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Signed increment per `(previous, current)` transition
///
/// Rows are the previous state, columns the current one, both in
/// `00, 01, 10, 11` order.
pub const DECODE_TABLE: [[i8; 4]; 4] = [
    //  00  01  10  11
    [0, 1, -1, 0],  // 00
    [-1, 0, 0, 1],  // 01
    [1, 0, 0, -1],  // 10
    [0, -1, 1, 0],  // 11
];

/// Table lookup for one transition
pub const fn decode_step(previous: QuadState, current: QuadState) -> i8 {
    DECODE_TABLE[previous.index()][current.index()]
}

/// Drive wheels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wheel {
    Left,
    Right,
}

/// Counting direction of an encoder
///
/// The two encoders face opposite ways on the chassis, so one of them has to
/// be inverted for forward motion to count up on both wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    Normal,
    Inverted,
}

/// Per-wheel decoder state
#[derive(Debug, Clone, Copy)]
pub struct EncoderState {
    previous: QuadState,
    position: i32,
    polarity: Polarity,
}

impl EncoderState {
    pub const fn new(polarity: Polarity) -> Self {
        Self {
            previous: QuadState::S00,
            position: 0,
            polarity,
        }
    }

    /// Decode one observed state, returning the applied increment
    pub fn update(&mut self, current: QuadState) -> i8 {
        let step = match self.polarity {
            Polarity::Normal => decode_step(self.previous, current),
            Polarity::Inverted => -decode_step(self.previous, current),
        };
        self.position = self.position.wrapping_add(step as i32);
        self.previous = current;
        step
    }

    /// Take `current` as the reference state without counting
    pub fn seed(&mut self, current: QuadState) {
        self.previous = current;
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn previous(&self) -> QuadState {
        self.previous
    }
}

/// Decoder for both wheels fed from one port snapshot
#[derive(Debug)]
pub struct QuadratureDecoder {
    left: EncoderState,
    right: EncoderState,
    left_shift: u8,
    right_shift: u8,
}

impl QuadratureDecoder {
    /// Decoder using the board's port layout, right wheel mirrored
    pub const fn new() -> Self {
        Self::with_layout(
            LEFT_ENCODER_SHIFT,
            Polarity::Normal,
            RIGHT_ENCODER_SHIFT,
            Polarity::Inverted,
        )
    }

    /// Decoder reading each wheel's two bits at the given shifts
    pub const fn with_layout(
        left_shift: u8,
        left_polarity: Polarity,
        right_shift: u8,
        right_polarity: Polarity,
    ) -> Self {
        Self {
            left: EncoderState::new(left_polarity),
            right: EncoderState::new(right_polarity),
            left_shift,
            right_shift,
        }
    }

    fn states(&self, snapshot: u32) -> (QuadState, QuadState) {
        (
            QuadState::from_bits((snapshot >> self.left_shift) as u8),
            QuadState::from_bits((snapshot >> self.right_shift) as u8),
        )
    }

    /// Decode both wheels from a single port read
    pub fn on_port_change(&mut self, snapshot: u32) {
        let (left, right) = self.states(snapshot);
        self.left.update(left);
        self.right.update(right);
    }

    /// Take the encoder levels at boot as reference without counting
    pub fn seed(&mut self, snapshot: u32) {
        let (left, right) = self.states(snapshot);
        self.left.seed(left);
        self.right.seed(right);
    }

    pub fn position(&self, wheel: Wheel) -> i32 {
        match wheel {
            Wheel::Left => self.left.position(),
            Wheel::Right => self.right.position(),
        }
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}
