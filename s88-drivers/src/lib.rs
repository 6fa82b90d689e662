//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in s88-core and s88-hal:
//!
//! - S88 feedback bus driver (shift-register chain polled over four lines)
//! - GPIO line bank built from `embedded-hal` digital pins

#![no_std]
#![deny(unsafe_code)]

pub mod lines;
pub mod s88;

pub use lines::PinLines;
pub use s88::S88;
