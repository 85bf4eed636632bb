//! Interrupt-shared motion state
//!
//! The tick handler and the pin-change handler own the tick service, the key
//! debouncer and the quadrature decoder. The control loop only ever gets
//! copies out of them.
//!
//! Every access, from either side, runs inside one critical section, so the
//! loop can never observe a half-updated position pair or debounce state.
//! Both handlers run at the same interrupt priority and do not nest.
//!
//! # Access Pattern
//! ```rust,ignore
//! // interrupt context
//! MOTION_STATE.on_timer_tick();
//! MOTION_STATE.sample_port(&mut port);
//!
//! // loop context
//! let events = MOTION_STATE.take_events();
//! let left = MOTION_STATE.get_position(Wheel::Left);
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use crate::system::config::KEY_BIT;
use crate::system::debounce::Debouncer;
use crate::system::port::PortSnapshot;
use crate::system::quadrature::{QuadratureDecoder, Wheel};
use crate::system::tick::{TickEvents, TickService};

/// State shared between the interrupt handlers and the control loop
pub static MOTION_STATE: SharedMotionState = SharedMotionState::new();

/// Wheel positions captured together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Positions {
    pub left: i32,
    pub right: i32,
}

/// Everything the loop has to act on since its last visit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopEvents {
    /// A confirmed key press
    pub key_pressed: bool,
    /// Fast events (~50 ms) since the last visit
    pub fast_events: u8,
    /// Positions latched on the last speed-period tick
    pub speed_sample: Option<Positions>,
    /// A slow analog sample is due
    pub slow_sample: bool,
    /// A status report is due
    pub status: bool,
    /// Ticks since boot
    pub uptime: u32,
}

struct InterruptState {
    tick: TickService,
    debouncer: Debouncer,
    decoder: QuadratureDecoder,
    fast_events: u8,
    speed_sample: Option<Positions>,
    slow_sample: bool,
    status: bool,
}

impl InterruptState {
    const fn new() -> Self {
        Self {
            tick: TickService::new(),
            debouncer: Debouncer::new(),
            decoder: QuadratureDecoder::new(),
            fast_events: 0,
            speed_sample: None,
            slow_sample: false,
            status: false,
        }
    }

    fn positions(&self) -> Positions {
        Positions {
            left: self.decoder.position(Wheel::Left),
            right: self.decoder.position(Wheel::Right),
        }
    }
}

/// Critical-section protected motion state
pub struct SharedMotionState {
    inner: Mutex<CriticalSectionRawMutex, RefCell<InterruptState>>,
}

impl SharedMotionState {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(InterruptState::new())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut InterruptState) -> R) -> R {
        self.inner.lock(|state| f(&mut state.borrow_mut()))
    }

    /// Timer interrupt: advance the tick service and the debounce countdown
    pub fn on_timer_tick(&self) -> TickEvents {
        self.with(|state| {
            let events = state.tick.on_tick();
            state.debouncer.on_tick();

            if events.fast {
                state.fast_events = state.fast_events.saturating_add(1);
            }
            if events.speed_sample {
                state.speed_sample = Some(state.positions());
            }
            state.slow_sample |= events.slow_sample;
            state.status |= events.status;
            events
        })
    }

    /// Pin-change interrupt: decode both wheels and feed the key debouncer
    /// from one port snapshot
    pub fn on_port_change(&self, snapshot: u32) {
        self.with(|state| {
            state.decoder.on_port_change(snapshot);
            state.debouncer.on_pin_change(snapshot & (1 << KEY_BIT) != 0);
        });
    }

    /// Pin-change interrupt: read one snapshot from `port` and process it
    ///
    /// Returns the snapshot so the caller can tell whether the port moved
    /// again while it was being handled.
    pub fn sample_port<P: PortSnapshot>(&self, port: &mut P) -> u32 {
        let snapshot = port.read_port_snapshot();
        self.on_port_change(snapshot);
        snapshot
    }

    /// Take the encoder levels at boot as reference, before interrupts run
    pub fn seed(&self, snapshot: u32) {
        self.with(|state| state.decoder.seed(snapshot));
    }

    /// Copy of one wheel position
    pub fn get_position(&self, wheel: Wheel) -> i32 {
        self.with(|state| state.decoder.position(wheel))
    }

    /// Copy of both wheel positions from the same instant
    pub fn positions(&self) -> Positions {
        self.with(|state| state.positions())
    }

    /// True exactly once per confirmed key press
    pub fn key_pressed(&self) -> bool {
        self.with(|state| state.debouncer.key_pressed())
    }

    /// Debounced key level
    pub fn key_level(&self) -> bool {
        self.with(|state| state.debouncer.stable_level())
    }

    /// Ticks since boot
    pub fn uptime(&self) -> u32 {
        self.with(|state| state.tick.uptime())
    }

    /// Consume every pending event in one critical section
    pub fn take_events(&self) -> LoopEvents {
        self.with(|state| LoopEvents {
            key_pressed: state.debouncer.key_pressed(),
            fast_events: core::mem::take(&mut state.fast_events),
            speed_sample: state.speed_sample.take(),
            slow_sample: core::mem::take(&mut state.slow_sample),
            status: core::mem::take(&mut state.status),
            uptime: state.tick.uptime(),
        })
    }
}

impl Default for SharedMotionState {
    fn default() -> Self {
        Self::new()
    }
}
