//! Reload pipeline
//!
//! A reload resolves resources, compiles every display on a worker pool
//! inside one [`ReloadContext`], and publishes the result as an immutable
//! [`Generation`].

pub mod context;
pub mod engine;

pub use context::{
    LineFont, LineFontRequest, ReloadContext, ReloadOutput, ReloadReport, ReloadWarning,
};
pub use engine::{
    DirectoryPackWriter, GeneratedTexture, Generation, HudEngine, PackWriter,
};
