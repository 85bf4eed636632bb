//! Port change task
//!
//! Waits for an edge on any encoder channel or on the key, then takes one
//! snapshot of the whole input port and hands it to the shared state. Both
//! wheels and the key are decoded from that single read.
//!
//! The edge waits are armed anew on every pass. The port is re-read after
//! arming, so a pin that moved while the last snapshot was being handled is
//! not left waiting for some other pin's edge.

use core::future::pending;

use defmt::info;
use embassy_futures::select::{select, select_array};
use embassy_rp::gpio::{Input, Pull};
use line_robot::system::port::PortSnapshot;
use line_robot::system::shared::MOTION_STATE;

use crate::task::resources::PortInputResources;
use crate::task::sensors::SioPort;

#[embassy_executor::task]
pub async fn port_change(r: PortInputResources) {
    let mut inputs = [
        Input::new(r.left_encoder_a, Pull::Up),
        Input::new(r.left_encoder_b, Pull::Up),
        Input::new(r.right_encoder_a, Pull::Up),
        Input::new(r.right_encoder_b, Pull::Up),
        Input::new(r.key, Pull::Down),
    ];
    let mut port = SioPort;

    let mut last = port.read_port_snapshot();
    MOTION_STATE.seed(last);
    info!("Encoders seeded");

    loop {
        let [a, b, c, d, e] = &mut inputs;
        let edges = select_array([
            a.wait_for_any_edge(),
            b.wait_for_any_edge(),
            c.wait_for_any_edge(),
            d.wait_for_any_edge(),
            e.wait_for_any_edge(),
        ]);
        // edges are polled first, so the re-read happens with the waits armed
        let moved = async {
            if port.read_port_snapshot() == last {
                pending::<()>().await;
            }
        };
        select(edges, moved).await;

        last = MOTION_STATE.sample_port(&mut port);
    }
}
