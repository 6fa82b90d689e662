//! Bus protocol state machine
//!
//! Every call to [`Sequencer::advance`] executes exactly one phase of the
//! scan. The phase is derived from a counter that restarts at zero once the
//! last bit of the last module has been sampled:
//!
//! ```text
//! counter  0..=2   idle, all lines low
//!          3       LOAD high (latches capture parallel inputs)
//!          4       CLOCK high
//!          5       CLOCK low, sample bit 0
//!          6..=8   settle
//!          9       RESET high (clear input latches)
//!          10      RESET low
//!          11      LOAD low
//!          12..    even: CLOCK high / odd: CLOCK low, sample next bit
//! ```
//!
//! These tick offsets follow the timing of the latch chips on the
//! feedback modules and must not be changed.

use s88_core::config::{S88Config, PINS_PER_MODULE};
use s88_hal::{GpioLines, LineId, PinMode};

use super::buffer::ModuleBuffer;

/// First counter value of the shifting phases
const SHIFT_START: u32 = 12;

/// Number of phases in one complete scan of `module_count` modules
///
/// Bit 0 is sampled during the load window; every further bit costs one
/// clock-high and one sample phase.
pub fn phases_per_scan(module_count: usize) -> u32 {
    let bits = (module_count * PINS_PER_MODULE) as u32;
    SHIFT_START + 2 * bits.saturating_sub(1)
}

/// Scan phase selected by the phase counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Lines at rest, nothing happens
    Idle,
    /// Raise LOAD
    LoadStrobe,
    /// Raise CLOCK for the first shift pulse
    FirstClock,
    /// Lower CLOCK and sample the first bit
    FirstSample,
    /// Wait inside the load window
    Settle,
    /// Raise RESET
    ResetPulseStart,
    /// Lower RESET
    ResetPulseEnd,
    /// Lower LOAD, ending the load window
    LoadRelease,
    /// Raise CLOCK
    ShiftClock,
    /// Lower CLOCK and sample the next bit
    ShiftSample,
}

impl Phase {
    /// Classify a phase counter value
    pub fn of(counter: u32) -> Self {
        match counter {
            0..=2 => Phase::Idle,
            3 => Phase::LoadStrobe,
            4 => Phase::FirstClock,
            5 => Phase::FirstSample,
            6..=8 => Phase::Settle,
            9 => Phase::ResetPulseStart,
            10 => Phase::ResetPulseEnd,
            11 => Phase::LoadRelease,
            n if n % 2 == 0 => Phase::ShiftClock,
            _ => Phase::ShiftSample,
        }
    }
}

/// The four control lines of a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusLines {
    /// Serial data input
    pub data: LineId,
    /// Shift clock output
    pub clock: LineId,
    /// Parallel load (PS) output
    pub load: LineId,
    /// Latch reset output
    pub reset: LineId,
}

impl BusLines {
    /// Take the line assignment from a bus config
    pub fn from_config(config: &S88Config) -> Self {
        Self {
            data: config.data_pin,
            clock: config.clock_pin,
            load: config.load_pin,
            reset: config.reset_pin,
        }
    }

    /// Set line directions and drive every output low
    pub fn init<G: GpioLines>(&self, gpio: &mut G) {
        gpio.configure(self.reset, PinMode::Output);
        gpio.configure(self.load, PinMode::Output);
        gpio.configure(self.clock, PinMode::Output);
        gpio.configure(self.data, PinMode::InputPullUp);
        gpio.set_low(self.reset);
        gpio.set_low(self.load);
        gpio.set_low(self.clock);
    }

    /// Drive every output low
    pub fn rest<G: GpioLines>(&self, gpio: &mut G) {
        gpio.set_low(self.load);
        gpio.set_low(self.clock);
        gpio.set_low(self.reset);
    }
}

/// Phase counter and write cursor of the scan in progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequencer {
    /// Phase to execute on the next advance
    counter: u32,
    /// Module receiving the next sampled bit
    module: usize,
    /// Bit within `module` receiving the next sampled bit
    bit: u8,
    /// Completed scans
    scans: u32,
}

impl Sequencer {
    /// Create a sequencer at the start of a scan
    pub const fn new() -> Self {
        Self {
            counter: 0,
            module: 0,
            bit: 0,
            scans: 0,
        }
    }

    /// Phase counter value of the next advance
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Phase the next advance will execute
    pub fn phase(&self) -> Phase {
        Phase::of(self.counter)
    }

    /// Position (module, bit) the next sampled bit is written to
    pub fn cursor(&self) -> (usize, u8) {
        (self.module, self.bit)
    }

    /// Number of completed scans (wrapping)
    pub fn scans(&self) -> u32 {
        self.scans
    }

    /// Execute one phase
    ///
    /// Returns `true` when this phase sampled the last bit of the chain. The
    /// scan is then restarted: counter and cursor go back to zero and all
    /// outputs are driven low, whatever phase was just executed.
    pub fn advance<G: GpioLines>(
        &mut self,
        gpio: &mut G,
        lines: &BusLines,
        buffer: &mut ModuleBuffer,
    ) -> bool {
        match self.phase() {
            Phase::Idle | Phase::Settle => {}
            Phase::LoadStrobe => gpio.set_high(lines.load),
            Phase::FirstClock | Phase::ShiftClock => gpio.set_high(lines.clock),
            Phase::FirstSample | Phase::ShiftSample => self.sample(gpio, lines, buffer),
            Phase::ResetPulseStart => gpio.set_high(lines.reset),
            Phase::ResetPulseEnd => gpio.set_low(lines.reset),
            Phase::LoadRelease => gpio.set_low(lines.load),
        }
        self.counter += 1;

        if self.module >= buffer.module_count() {
            self.counter = 0;
            self.module = 0;
            self.bit = 0;
            self.scans = self.scans.wrapping_add(1);
            lines.rest(gpio);
            return true;
        }

        false
    }

    /// Falling clock edge, then sample the data line into the buffer
    fn sample<G: GpioLines>(&mut self, gpio: &mut G, lines: &BusLines, buffer: &mut ModuleBuffer) {
        gpio.set_low(lines.clock);
        let high = gpio.read(lines.data);
        buffer.write_bit(self.module, self.bit, high);

        self.bit += 1;
        if usize::from(self.bit) == PINS_PER_MODULE {
            self.bit = 0;
            self.module += 1;
        }
    }
}
