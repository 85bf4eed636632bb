//! Hardware ports consumed by the motion core
//!
//! The core never touches a register. It reads the robot through these
//! traits; the firmware implements them on top of the RP2350 peripherals and
//! [`fake`](crate::system::fake) implements them for host tests.

/// Line and proximity sensors, read once per control-loop iteration
pub trait SensorPort {
    /// Line sensor bit pattern (right, center, left as bit 2, 1, 0)
    fn read_line_sensor(&mut self) -> u8;

    /// Raw proximity reading, 10-bit
    fn read_proximity(&mut self) -> u16;
}

/// Snapshot of the whole input port in one read
///
/// Both encoders and the key are taken from the same snapshot so the two
/// wheels can never be decoded from different instants.
pub trait PortSnapshot {
    fn read_port_snapshot(&mut self) -> u32;
}

/// Sensor values of one control-loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    pub line_code: u8,
    pub proximity_raw: u16,
}

impl SensorSnapshot {
    /// Read both sensors
    pub fn read<S: SensorPort>(sensors: &mut S) -> Self {
        Self {
            line_code: sensors.read_line_sensor(),
            proximity_raw: sensors.read_proximity(),
        }
    }
}
