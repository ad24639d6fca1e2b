//! Text pattern compiler
//!
//! Turns a pattern string into a per-subject stream of styled characters.

pub mod equation;
pub mod markup;
pub mod number_format;
pub mod pattern;

pub use equation::Equation;
pub use number_format::NumberFormat;
pub use pattern::{NumberFormatter, StyledChar, TextOptions, TextPattern};
