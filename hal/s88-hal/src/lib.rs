//! S88 Hardware Abstraction Layer
//!
//! This crate defines the GPIO capability the feedback bus driver consumes.
//! Board support code implements it over real pins; tests implement it over
//! simulated lines. The driver never touches hardware registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Host loop / composition root           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  s88-drivers (bus sequencer)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  s88-hal (this crate - traits)          │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  simulated    │
//! │    pins       │       │    lines      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioLines`] - Direction control, level write and level read by line id

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

// Re-export key items at crate root for convenience
pub use gpio::{GpioLines, LineId, PinMode};
