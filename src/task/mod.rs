pub mod control;
pub mod indicator;
pub mod motor_pwm;
pub mod port_change;
pub mod resources;
pub mod sensors;
pub mod tick;
