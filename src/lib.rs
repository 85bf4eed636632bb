#![cfg_attr(not(test), no_std)]

//! line_robot - motion-control core for a small line-following robot
//!
//! This library holds everything that does not touch a register: the tick
//! service, the key debouncer, the quadrature decoder, the PWM duty driver,
//! the speed estimator and the decision logic that turns sensor readings into
//! wheel duties. The firmware binary (`rp2350` feature) wires these to the
//! hardware from interrupt and thread-mode tasks.

#[macro_use]
mod log;

/// Core motion-control components
pub mod system;
