//! Display rendering
//!
//! Turns commands into a two-row [`Layout`] and pushes it to a
//! [`CharDisplay`](crate::traits::CharDisplay).

pub mod layout;
pub mod renderer;

pub use layout::{Layout, Line};
pub use renderer::Renderer;
