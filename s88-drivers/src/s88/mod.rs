//! S88 feedback bus
//!
//! Occupancy detectors feed a chain of parallel-in/serial-out modules,
//! 8 inputs each. The bus is read by strobing the parallel load line,
//! pulsing the latch reset, then clocking every bit out on the data line.
//! One control-line transition happens per tick, so a full scan of N
//! modules takes `12 + 2 * (8 * N - 1)` ticks.

pub mod buffer;
pub mod device;
pub mod sequencer;
pub mod ticker;

pub use buffer::{ModuleBuffer, PinMapper};
pub use device::S88;
pub use sequencer::{phases_per_scan, BusLines, Phase, Sequencer};
pub use ticker::TickScheduler;
