//! Placeholders and conditions
//!
//! Producers are the engine's only window into subject state besides heads.

pub mod condition;
pub mod pattern;
pub mod registry;
pub mod value;

pub use condition::ConditionBuilder;
pub use pattern::PlaceholderPattern;
pub use registry::{PlaceholderRegistry, Producer};
pub use value::{Value, ValueKind};
