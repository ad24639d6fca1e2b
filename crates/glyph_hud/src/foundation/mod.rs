//! Foundation module - Core utilities shared by the reload pipeline
//!
//! - Logging set-up
//! - Scoped worker pool
//! - Timing

pub mod logging;
pub mod parallel;
pub mod time;
