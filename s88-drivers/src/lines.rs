//! GPIO line bank over `embedded-hal` pins
//!
//! Boards that hand out typed digital pins can wrap the four bus lines in a
//! [`PinLines`] and pass it to the driver. Line directions are fixed by the
//! pin types, so `configure` has nothing to do. Pin errors are dropped on
//! write and read as low.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use s88_core::config::S88Config;
use s88_core::Vpin;
use s88_hal::{GpioLines, LineId, PinMode};

/// Line id of the data input
pub const DATA_LINE: LineId = 0;
/// Line id of the clock output
pub const CLOCK_LINE: LineId = 1;
/// Line id of the load output
pub const LOAD_LINE: LineId = 2;
/// Line id of the reset output
pub const RESET_LINE: LineId = 3;

/// Four typed pins addressed as lines 0..=3
pub struct PinLines<D, C, L, R> {
    data: D,
    clock: C,
    load: L,
    reset: R,
}

impl<D, C, L, R> PinLines<D, C, L, R>
where
    D: InputPin,
    C: OutputPin,
    L: OutputPin,
    R: OutputPin,
{
    /// Wrap the four bus pins
    pub fn new(data: D, clock: C, load: L, reset: R) -> Self {
        Self {
            data,
            clock,
            load,
            reset,
        }
    }

    /// Bus config using this bank's line ids
    pub fn bus_config(first_vpin: Vpin, pin_count: u16) -> S88Config {
        S88Config::new(
            first_vpin, pin_count, DATA_LINE, CLOCK_LINE, LOAD_LINE, RESET_LINE,
        )
    }

    /// Return the pins
    pub fn release(self) -> (D, C, L, R) {
        (self.data, self.clock, self.load, self.reset)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) {
    pin.set_state(PinState::from(high)).ok();
}

impl<D, C, L, R> GpioLines for PinLines<D, C, L, R>
where
    D: InputPin,
    C: OutputPin,
    L: OutputPin,
    R: OutputPin,
{
    fn configure(&mut self, _line: LineId, _mode: PinMode) {}

    fn write(&mut self, line: LineId, high: bool) {
        match line {
            CLOCK_LINE => drive(&mut self.clock, high),
            LOAD_LINE => drive(&mut self.load, high),
            RESET_LINE => drive(&mut self.reset, high),
            _ => {}
        }
    }

    fn read(&mut self, line: LineId) -> bool {
        match line {
            DATA_LINE => self.data.is_high().unwrap_or(false),
            _ => false,
        }
    }
}
