//! GPIO line abstractions
//!
//! Provides the line capability used by bus drivers. Lines are addressed by
//! a small numeric id so that a single capability object can serve several
//! independently directed lines.

/// Identifier of a single GPIO line
pub type LineId = u8;

/// Direction and bias of a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Push-pull output
    Output,
    /// Floating input
    Input,
    /// Input with internal pull-up enabled
    InputPullUp,
}

/// A set of digital lines that can be configured, driven and sampled
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. All operations are expected to complete without
/// blocking.
pub trait GpioLines {
    /// Configure the direction of a line
    fn configure(&mut self, line: LineId, mode: PinMode);

    /// Drive an output line to the given level (`true` = high)
    fn write(&mut self, line: LineId, high: bool);

    /// Sample the level of an input line (`true` = high)
    ///
    /// Takes `&mut self` because sampling may require mutable access to the
    /// underlying peripheral.
    fn read(&mut self, line: LineId) -> bool;

    /// Drive an output line high
    fn set_high(&mut self, line: LineId) {
        self.write(line, true);
    }

    /// Drive an output line low
    fn set_low(&mut self, line: LineId) {
        self.write(line, false);
    }
}

impl<T: GpioLines + ?Sized> GpioLines for &mut T {
    fn configure(&mut self, line: LineId, mode: PinMode) {
        (**self).configure(line, mode);
    }

    fn write(&mut self, line: LineId, high: bool) {
        (**self).write(line, high);
    }

    fn read(&mut self, line: LineId) -> bool {
        (**self).read(line)
    }
}
