//! Popup and HUD composition
//!
//! Compiled layouts are stacked into displays; a display renders one subject
//! in one location slot at one animation frame.

pub mod composer;
pub mod container;

pub use composer::{CompiledDisplay, CompiledLayout};
pub use container::LayoutComponentContainer;
