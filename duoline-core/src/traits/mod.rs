//! Hardware abstraction traits
//!
//! These traits define the interface between the pipeline logic
//! and board-specific implementations.

pub mod display;
pub mod outputs;

pub use display::{CharDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
pub use outputs::OutputBank;
