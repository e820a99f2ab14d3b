//! Discrete output drivers

pub mod gpio;

pub use gpio::GpioBank;
