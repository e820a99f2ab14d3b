//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in duoline-core:
//!
//! - HD44780 character LCD behind a PCF8574 I2C backpack
//! - Eight-pin GPIO LED bank

#![no_std]
#![deny(unsafe_code)]

pub mod lcd;
pub mod outputs;

pub use lcd::{Hd44780, Hd44780Error};
pub use outputs::GpioBank;
