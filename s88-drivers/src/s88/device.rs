//! S88 bus device
//!
//! Ties the ticker, sequencer and buffer to a GPIO capability and exposes
//! the sampled inputs as virtual pins.

use s88_core::config::{ConfigError, S88Config};
use s88_core::{DeviceState, IoDevice, Micros, Vpin};
use s88_hal::GpioLines;

use super::buffer::{ModuleBuffer, PinMapper};
use super::sequencer::{BusLines, Phase, Sequencer};
use super::ticker::TickScheduler;

/// S88 feedback bus driver
///
/// Reads are served from the last completed sample of each bit. A bit keeps
/// its previous value until the running scan overwrites it.
pub struct S88<G> {
    gpio: G,
    lines: BusLines,
    mapper: PinMapper,
    buffer: ModuleBuffer,
    sequencer: Sequencer,
    ticker: TickScheduler,
    first_vpin: Vpin,
    pin_count: u16,
    state: DeviceState,
    /// Lines are configured; stepping is a no-op until then
    begun: bool,
}

impl<G: GpioLines> S88<G> {
    /// Create a driver for the bus described by `config`
    ///
    /// The lines are not touched until [`IoDevice::begin`] is called, and
    /// [`IoDevice::step`] does nothing before that.
    pub fn new(config: &S88Config, gpio: G) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            gpio,
            lines: BusLines::from_config(config),
            mapper: PinMapper::new(config.first_vpin, config.pin_count),
            buffer: ModuleBuffer::new(config.pin_count)?,
            sequencer: Sequencer::new(),
            ticker: TickScheduler::new(config.interval_us),
            first_vpin: config.first_vpin,
            pin_count: config.pin_count,
            state: DeviceState::Normal,
            begun: false,
        })
    }

    /// Check whether the lines have been configured
    pub fn is_begun(&self) -> bool {
        self.begun
    }

    /// Number of chained modules
    pub fn module_count(&self) -> usize {
        self.buffer.module_count()
    }

    /// Sampled module bytes
    pub fn buffer(&self) -> &ModuleBuffer {
        &self.buffer
    }

    /// Phase the next tick will execute
    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    /// Phase counter value of the next tick
    pub fn phase_counter(&self) -> u32 {
        self.sequencer.counter()
    }

    /// Position (module, bit) the next sampled bit is written to
    pub fn cursor(&self) -> (usize, u8) {
        self.sequencer.cursor()
    }

    /// Number of completed scans (wrapping)
    pub fn scan_count(&self) -> u32 {
        self.sequencer.scans()
    }

    /// Control line assignment
    pub fn bus_lines(&self) -> &BusLines {
        &self.lines
    }

    /// Phase interval gate
    pub fn ticker(&self) -> &TickScheduler {
        &self.ticker
    }

    /// Access the GPIO capability
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Mutable access to the GPIO capability
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Consume the driver and return the GPIO capability
    pub fn release(self) -> G {
        self.gpio
    }
}

impl<G: GpioLines> IoDevice for S88<G> {
    fn begin(&mut self) {
        self.lines.init(&mut self.gpio);
        self.begun = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "S88 initialised: {} modules on Vpins {}-{}",
            self.buffer.module_count(),
            self.first_vpin,
            self.status().last_vpin()
        );
    }

    fn step(&mut self, now: Micros) {
        if !self.begun || !self.ticker.due(now) {
            return;
        }

        let completed = self
            .sequencer
            .advance(&mut self.gpio, &self.lines, &mut self.buffer);

        if completed {
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "S88 Vpin {}: scan {} complete {=[u8]:x}",
                self.first_vpin,
                self.sequencer.scans(),
                self.buffer.as_slice()
            );
        }
    }

    fn read(&self, vpin: Vpin) -> bool {
        self.mapper.read(&self.buffer, vpin)
    }

    fn first_vpin(&self) -> Vpin {
        self.first_vpin
    }

    fn pin_count(&self) -> u16 {
        self.pin_count
    }

    fn state(&self) -> DeviceState {
        self.state
    }

    fn set_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    fn kind(&self) -> &'static str {
        "S88"
    }
}
