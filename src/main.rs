//! Robot firmware entry point
//!
//! Initializes the system and spawns the control tasks.
//!
//! # Executors
//! - Interrupt executor (software interrupt, priority 2): tick service and
//!   port-change handling. Both run at the same priority and never nest.
//! - Thread executor: the control loop, preempted by the interrupt executor.

#![no_std]
#![no_main]

use crate::task::{control::control, port_change::port_change, tick::tick};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use task::resources::{
    AssignedResources, IndicatorResources, MotorDriverResources, PortInputResources,
    SensorResources,
};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Task implementations and hardware backends
mod task;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = split_resources!(p);

    // Tick and pin-change handling preempt the control loop
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(port_change(r.port_inputs)).unwrap();
    high_spawner.spawn(tick()).unwrap();

    spawner
        .spawn(control(r.motor_driver, r.sensors, r.indicators))
        .unwrap();
}
