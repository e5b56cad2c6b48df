//! Presentation of the display state

pub mod render;
pub mod result;
