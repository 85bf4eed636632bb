//! Periodic tick task
//!
//! Runs on the high-priority interrupt executor. Every period it advances the
//! shared tick service and debounce countdown, and checks that the ticks are
//! still arriving on time.
//!
//! A tick that arrives later than the heartbeat limit means the control core
//! has stalled. That is fatal: the task logs it and panics, and the external
//! watchdog resets the board.

use defmt::{info, panic};
use embassy_time::{Duration, Instant, Ticker};
use line_robot::system::config::TICK_PERIOD_US;
use line_robot::system::shared::MOTION_STATE;
use line_robot::system::tick::HeartbeatMonitor;

#[embassy_executor::task]
pub async fn tick() {
    let monitor = HeartbeatMonitor::new();
    let mut ticker = Ticker::every(Duration::from_micros(TICK_PERIOD_US as u64));
    let mut last_tick = Instant::now();

    info!("Tick service running, period {} us", TICK_PERIOD_US);

    loop {
        ticker.next().await;

        let now = Instant::now();
        let elapsed_us = (now - last_tick).as_micros() as u32;
        last_tick = now;

        if let Err(e) = monitor.check(elapsed_us) {
            panic!("Tick service stalled: {:?}", e);
        }

        MOTION_STATE.on_timer_tick();
    }
}
