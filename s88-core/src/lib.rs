//! Board-agnostic core logic for the S88 feedback bus
//!
//! This crate contains everything that does not depend on a specific
//! bus driver or board:
//!
//! - Virtual pin device trait and status reporting
//! - Device registry owned by the composition root
//! - Configuration types, TOML-subset parser and binary encoding

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod device;
pub mod registry;

pub use device::{DeviceState, DeviceStatus, IoDevice, Micros, Vpin};
pub use registry::{DeviceRegistry, RegistryError};
