//! Device registry
//!
//! The registry is owned by the composition root. Devices are handed to it
//! by whoever assembles the system; nothing registers itself. The host loop
//! then drives every device through [`DeviceRegistry::poll`] and serves
//! virtual pin reads through [`DeviceRegistry::read`].
//!
//! Lookup is a linear scan in registration order, so when ranges overlap
//! the device registered first wins.

use core::fmt;

use heapless::Vec;

use crate::device::{DeviceState, DeviceStatus, IoDevice, Micros, Vpin};

/// Errors returned by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// No room left for another device
    Full,
}

/// Fixed-capacity list of devices dispatched by virtual pin
pub struct DeviceRegistry<'a, const N: usize> {
    devices: Vec<&'a mut dyn IoDevice, N>,
    /// Set once `begin_all` has run; later registrations begin immediately
    started: bool,
}

impl<'a, const N: usize> Default for DeviceRegistry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> DeviceRegistry<'a, N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            devices: Vec::new(),
            started: false,
        }
    }

    /// Add a device to the end of the dispatch list
    pub fn register(&mut self, device: &'a mut dyn IoDevice) -> Result<(), RegistryError> {
        self.devices
            .push(device)
            .map_err(|_| RegistryError::Full)?;

        if let Some(device) = self.devices.last_mut() {
            #[cfg(feature = "defmt")]
            {
                let status = device.status();
                defmt::debug!(
                    "Registered {} on Vpins {}-{}",
                    status.kind,
                    status.first_vpin,
                    status.last_vpin()
                );
            }

            if self.started {
                device.begin();
            }
        }

        Ok(())
    }

    /// Initialise every registered device
    ///
    /// Has no effect after the first call.
    pub fn begin_all(&mut self) {
        if self.started {
            return;
        }

        for device in self.devices.iter_mut() {
            device.begin();
        }
        self.started = true;
    }

    /// Check whether `begin_all` has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Step every online device once
    pub fn poll(&mut self, now: Micros) {
        for device in self.devices.iter_mut() {
            if device.state() != DeviceState::Failed {
                device.step(now);
            }
        }
    }

    /// Find the device serving a virtual pin
    pub fn find(&self, vpin: Vpin) -> Option<&dyn IoDevice> {
        self.devices
            .iter()
            .find(|device| device.owns(vpin))
            .map(|device| &**device)
    }

    /// Check whether any device serves the virtual pin
    pub fn exists(&self, vpin: Vpin) -> bool {
        self.find(vpin).is_some()
    }

    /// Read a virtual pin
    ///
    /// Pins not served by any device read as `false`.
    pub fn read(&self, vpin: Vpin) -> bool {
        match self.find(vpin) {
            Some(device) => device.read(vpin),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("read(): Vpin {} not found", vpin);
                false
            }
        }
    }

    /// Read a virtual pin as an integer truth value (0 or 1)
    pub fn read_value(&self, vpin: Vpin) -> i32 {
        i32::from(self.read(vpin))
    }

    /// Set the online state of the device serving a virtual pin
    ///
    /// Returns `false` if no device serves the pin.
    pub fn set_state(&mut self, vpin: Vpin, state: DeviceState) -> bool {
        match self.devices.iter_mut().find(|device| device.owns(vpin)) {
            Some(device) => {
                device.set_state(state);
                true
            }
            None => false,
        }
    }

    /// Diagnostic snapshot of every device in registration order
    pub fn statuses(&self) -> Vec<DeviceStatus, N> {
        self.devices.iter().map(|device| device.status()).collect()
    }

    /// Write one status line per device
    pub fn dump_all<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for device in self.devices.iter() {
            writeln!(out, "{}", device.status())?;
        }
        Ok(())
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if no device is registered
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
