//! Configuration type definitions

use heapless::{String, Vec};
use s88_hal::LineId;

use crate::device::Vpin;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Inputs carried by one feedback module
pub const PINS_PER_MODULE: usize = 8;

/// Maximum chained modules per bus, the range of an 8-bit module count
pub const MAX_MODULES: usize = 255;

/// Maximum virtual pins per bus
pub const MAX_PINS: u16 = (MAX_MODULES * PINS_PER_MODULE) as u16;

/// Maximum buses per configuration
pub const MAX_DEVICES: usize = 8;

/// Default time between two bus phases in microseconds
pub const DEFAULT_INTERVAL_US: u32 = 400;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin count is zero
    NoPins,
    /// Pin count exceeds [`MAX_PINS`]
    TooManyPins,
    /// Virtual pin range runs past the largest virtual pin number
    VpinOverflow,
    /// Two control lines share the same GPIO line
    DuplicateLine,
    /// Phase interval is zero
    ZeroInterval,
    /// More than [`MAX_DEVICES`] buses configured
    TooManyDevices,
    /// Two buses claim the same virtual pin
    OverlappingRange,
    /// Config version mismatch
    VersionMismatch,
    /// Serialization failed (buffer too small)
    Encode,
    /// Deserialization failed
    Decode,
}

/// One feedback bus: four control lines and the virtual pins it serves
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct S88Config {
    /// Bus name (e.g., "yard", "station")
    pub label: String<MAX_LABEL_LEN>,
    /// First virtual pin served
    pub first_vpin: Vpin,
    /// Number of inputs on the bus (8 per module)
    pub pin_count: u16,
    /// Serial data input line
    pub data_pin: LineId,
    /// Shift clock output line
    pub clock_pin: LineId,
    /// Parallel load (PS) output line
    pub load_pin: LineId,
    /// Latch reset output line
    pub reset_pin: LineId,
    /// Time between two bus phases in microseconds
    pub interval_us: u32,
}

impl Default for S88Config {
    fn default() -> Self {
        Self {
            label: String::new(),
            first_vpin: 0,
            pin_count: 16,
            data_pin: 0,
            clock_pin: 1,
            load_pin: 2,
            reset_pin: 3,
            interval_us: DEFAULT_INTERVAL_US,
        }
    }
}

impl S88Config {
    /// Create a bus config with the default phase interval
    pub fn new(
        first_vpin: Vpin,
        pin_count: u16,
        data_pin: LineId,
        clock_pin: LineId,
        load_pin: LineId,
        reset_pin: LineId,
    ) -> Self {
        Self {
            label: String::new(),
            first_vpin,
            pin_count,
            data_pin,
            clock_pin,
            load_pin,
            reset_pin,
            interval_us: DEFAULT_INTERVAL_US,
        }
    }

    /// Number of chained modules needed to carry `pin_count` inputs
    pub fn module_count(&self) -> usize {
        usize::from(self.pin_count).div_ceil(PINS_PER_MODULE)
    }

    /// Last virtual pin served (inclusive), if the range is non-empty and fits
    pub fn last_vpin(&self) -> Option<Vpin> {
        self.pin_count
            .checked_sub(1)
            .and_then(|span| self.first_vpin.checked_add(span))
    }

    /// Control lines in data, clock, load, reset order
    pub fn lines(&self) -> [LineId; 4] {
        [self.data_pin, self.clock_pin, self.load_pin, self.reset_pin]
    }

    /// Check whether two buses claim a common virtual pin
    pub fn overlaps(&self, other: &S88Config) -> bool {
        match (self.last_vpin(), other.last_vpin()) {
            (Some(last), Some(other_last)) => {
                self.first_vpin <= other_last && other.first_vpin <= last
            }
            _ => false,
        }
    }

    /// Validate a single bus
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pin_count == 0 {
            return Err(ConfigError::NoPins);
        }
        if self.pin_count > MAX_PINS {
            return Err(ConfigError::TooManyPins);
        }
        if self.last_vpin().is_none() {
            return Err(ConfigError::VpinOverflow);
        }
        if self.interval_us == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let lines = self.lines();
        for (i, line) in lines.iter().enumerate() {
            if lines[i + 1..].contains(line) {
                return Err(ConfigError::DuplicateLine);
            }
        }

        Ok(())
    }
}

/// Complete bus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Feedback buses
    pub devices: Vec<S88Config, MAX_DEVICES>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            devices: Vec::new(),
        }
    }
}

impl BusConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bus
    pub fn push(&mut self, device: S88Config) -> Result<(), ConfigError> {
        self.devices
            .push(device)
            .map_err(|_| ConfigError::TooManyDevices)
    }

    /// Find a bus by label
    pub fn find(&self, label: &str) -> Option<&S88Config> {
        self.devices.iter().find(|d| d.label.as_str() == label)
    }

    /// Total virtual pins across all buses
    pub fn total_pins(&self) -> u32 {
        self.devices.iter().map(|d| u32::from(d.pin_count)).sum()
    }

    /// Validate every bus and the absence of overlapping ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        for (i, device) in self.devices.iter().enumerate() {
            device.validate()?;
            if self.devices[i + 1..].iter().any(|other| device.overlaps(other)) {
                return Err(ConfigError::OverlappingRange);
            }
        }

        Ok(())
    }
}
