//! Module shift buffer and virtual pin mapping

use heapless::Vec;
use s88_core::config::{ConfigError, MAX_MODULES, MAX_PINS, PINS_PER_MODULE};
use s88_core::Vpin;

/// Last sampled value of every input, one byte per module
///
/// Sized once at construction and never resized. Bit `n` of module `m`
/// holds input `m * 8 + n`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleBuffer {
    modules: Vec<u8, MAX_MODULES>,
}

impl ModuleBuffer {
    /// Allocate a zeroed buffer large enough for `pin_count` inputs
    pub fn new(pin_count: u16) -> Result<Self, ConfigError> {
        if pin_count == 0 {
            return Err(ConfigError::NoPins);
        }
        if pin_count > MAX_PINS {
            return Err(ConfigError::TooManyPins);
        }

        let count = usize::from(pin_count).div_ceil(PINS_PER_MODULE);
        let mut modules = Vec::new();
        modules
            .resize(count, 0)
            .map_err(|_| ConfigError::TooManyPins)?;

        Ok(Self { modules })
    }

    /// Number of modules in the chain
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Raw byte of one module
    pub fn module(&self, index: usize) -> Option<u8> {
        self.modules.get(index).copied()
    }

    /// All module bytes in chain order
    pub fn as_slice(&self) -> &[u8] {
        &self.modules
    }

    /// Read one bit; out of range reads as `false`
    pub fn bit(&self, module: usize, bit: u8) -> bool {
        match self.modules.get(module) {
            Some(byte) if bit < 8 => byte & (1 << bit) != 0,
            _ => false,
        }
    }

    /// Store one sampled bit; out of range writes are dropped
    pub fn write_bit(&mut self, module: usize, bit: u8, high: bool) {
        if bit >= 8 {
            return;
        }
        if let Some(byte) = self.modules.get_mut(module) {
            if high {
                *byte |= 1 << bit;
            } else {
                *byte &= !(1 << bit);
            }
        }
    }
}

/// Translates virtual pin numbers into buffer positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMapper {
    first_vpin: Vpin,
    pin_count: u16,
}

impl PinMapper {
    /// Create a mapper for `[first_vpin, first_vpin + pin_count)`
    pub const fn new(first_vpin: Vpin, pin_count: u16) -> Self {
        Self {
            first_vpin,
            pin_count,
        }
    }

    /// Module index and bit offset of a virtual pin, if it is in range
    ///
    /// Bits of the last module beyond `pin_count` are never reachable.
    pub fn locate(&self, vpin: Vpin) -> Option<(usize, u8)> {
        let pin = vpin.checked_sub(self.first_vpin)?;
        if pin >= self.pin_count {
            return None;
        }
        Some((usize::from(pin) / PINS_PER_MODULE, (pin % 8) as u8))
    }

    /// Last completed value of a virtual pin; `false` when out of range
    pub fn read(&self, buffer: &ModuleBuffer, vpin: Vpin) -> bool {
        self.locate(vpin)
            .is_some_and(|(module, bit)| buffer.bit(module, bit))
    }
}
