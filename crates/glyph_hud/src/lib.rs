//! # Glyph HUD
//!
//! A layout and glyph-packing engine for clients that can only draw bitmap
//! fonts. Every visual element of a HUD or popup (letters, icons, text
//! backgrounds, player heads) becomes a codepoint bound to a bitmap at a
//! vertical offset, and every frame becomes a run of those codepoints whose
//! pixel width is known exactly.
//!
//! ## Features
//!
//! - **Width algebra**: additive glyph runs with signed spacers
//! - **Glyph packing**: deduplicated codepoint bindings and font documents
//! - **Text layout**: placeholders, markup, line splitting and backgrounds
//! - **Conditions**: typed comparisons compiled once per reload
//! - **Hot reload**: whole generations built in parallel and swapped atomically
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyph_hud::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = HudSettings::load_from_file("settings.toml")?;
//!     let bundle = LayoutBundle::load_tagged("layouts.toml")?;
//!
//!     let engine = HudEngine::new(
//!         settings,
//!         PlaceholderRegistry::with_builtins(),
//!         DirectoryProbe::new("assets"),
//!     );
//!     let report = engine.reload(&bundle);
//!     for warning in &report.warnings {
//!         eprintln!("{warning}");
//!     }
//!
//!     let player = SubjectState::new("alex").with_attribute("health", 17.0);
//!     let generation = engine.current();
//!     if let Some(hud) = generation.render_hud("main", &RenderContext::detached(), &player) {
//!         println!("{} glyphs, {} px", hud.glyphs().len(), hud.width());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::missing_errors_doc
)]

pub mod component;
pub mod config;
pub mod definition;
pub mod element;
pub mod error;
pub mod font;
pub mod foundation;
pub mod layout;
pub mod placeholder;
pub mod popup;
pub mod reload;
pub mod resource;
pub mod subject;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{HudError, HudResult, PackError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        component::{Glyph, PixelComponent, Style, TextColor, WidthComponent},
        config::{Config, ConfigError, HudSettings},
        definition::LayoutBundle,
        error::{HudError, HudResult, PackError},
        placeholder::{PlaceholderRegistry, Value, ValueKind},
        popup::CompiledDisplay,
        reload::{
            DirectoryPackWriter, Generation, HudEngine, PackWriter, ReloadReport, ReloadWarning,
        },
        resource::{DirectoryProbe, ImageProbe, NoProbe},
        subject::{
            AttributeSkinProvider, RenderContext, SkinProvider, Subject, SubjectMap,
            SubjectState,
        },
    };
}
