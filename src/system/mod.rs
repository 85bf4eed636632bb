//! Core motion-control components
pub mod beeper;
pub mod config;
pub mod control;
pub mod debounce;
pub mod decision;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod port;
pub mod proximity;
pub mod pwm;
pub mod quadrature;
pub mod shared;
pub mod speed;
pub mod tick;
