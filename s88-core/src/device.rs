//! Virtual pin devices
//!
//! A device owns a contiguous range of virtual pins and is driven by the
//! host loop through [`IoDevice::step`]. Devices must never block: any
//! waiting is expressed by comparing timestamps inside `step`.

use core::fmt;

/// Virtual pin number
pub type Vpin = u16;

/// Microsecond timestamp from a free-running, wrapping clock
pub type Micros = u32;

/// Online/offline flag maintained by the host framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Device is serviced normally
    #[default]
    Normal,
    /// Device has been taken offline and is no longer stepped
    Failed,
}

/// Diagnostic snapshot of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceStatus {
    /// Human readable device kind (e.g. "S88")
    pub kind: &'static str,
    /// First virtual pin served
    pub first_vpin: Vpin,
    /// Number of virtual pins served
    pub pin_count: u16,
    /// Current online state
    pub state: DeviceState,
}

impl DeviceStatus {
    /// Last virtual pin served (inclusive)
    ///
    /// Returns `first_vpin` for a device with no pins.
    pub fn last_vpin(&self) -> Vpin {
        self.first_vpin
            .saturating_add(self.pin_count.saturating_sub(1))
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Configured on Vpins:{}-{}",
            self.kind,
            self.first_vpin,
            self.last_vpin()
        )?;
        if self.state == DeviceState::Failed {
            f.write_str(" OFFLINE")?;
        }
        Ok(())
    }
}

/// Trait for devices exposing virtual pins to the host framework
pub trait IoDevice {
    /// Initialise the hardware behind the device
    ///
    /// Called exactly once, either by [`DeviceRegistry::begin_all`] or on
    /// registration if the registry has already been started.
    ///
    /// [`DeviceRegistry::begin_all`]: crate::registry::DeviceRegistry::begin_all
    fn begin(&mut self);

    /// Periodic entry point, called repeatedly by the host loop
    ///
    /// Must return promptly. Implementations decide from `now` whether any
    /// work is due.
    fn step(&mut self, now: Micros);

    /// Read the last known value of a virtual pin
    ///
    /// Pins outside the device's range read as `false`.
    fn read(&self, vpin: Vpin) -> bool;

    /// First virtual pin served by this device
    fn first_vpin(&self) -> Vpin;

    /// Number of virtual pins served by this device
    fn pin_count(&self) -> u16;

    /// Current online state
    fn state(&self) -> DeviceState;

    /// Update the online state
    fn set_state(&mut self, state: DeviceState);

    /// Device kind used in diagnostics
    fn kind(&self) -> &'static str {
        "Unknown device"
    }

    /// Check whether the virtual pin belongs to this device
    fn owns(&self, vpin: Vpin) -> bool {
        vpin.checked_sub(self.first_vpin())
            .is_some_and(|offset| offset < self.pin_count())
    }

    /// Diagnostic snapshot
    fn status(&self) -> DeviceStatus {
        DeviceStatus {
            kind: self.kind(),
            first_vpin: self.first_vpin(),
            pin_count: self.pin_count(),
            state: self.state(),
        }
    }
}
