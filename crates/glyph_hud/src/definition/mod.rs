//! Declarative layout input
//!
//! These types are what configuration files deserialize into. They are
//! validated only structurally here; range checks happen when elements are
//! compiled, so a bad value skips one element instead of the whole file.

pub mod display;
pub mod layout;
pub mod location;
pub mod resource;

pub use display::{HudDef, LayoutRef, LocationGroupDef, PopupDef};
pub use layout::{
    AnimationDef, ElementDef, HeadLayoutDef, ImageLayoutDef, LayoutDef, TextLayoutDef,
};
pub use location::{GuiLocation, PixelLocation, RenderScale};
pub use resource::{BackgroundDef, BitmapDef, FrameDef, HeadDef, IconDef, ImageDef, TextFontDef};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// One comparison of a condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConditionRule {
    /// Left operand: placeholder reference or literal
    pub first: String,
    /// Right operand: placeholder reference or literal
    pub second: String,
    /// Comparison operator
    pub operation: String,
    /// How this rule joins the rules before it, `and` when missing
    #[serde(default)]
    pub gate: Option<String>,
}

impl ConditionRule {
    /// Build a rule joined with `and`
    pub fn new(first: &str, operation: &str, second: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            operation: operation.to_string(),
            gate: None,
        }
    }

    /// Same rule joined with `gate`
    pub fn with_gate(mut self, gate: &str) -> Self {
        self.gate = Some(gate.to_string());
        self
    }
}

/// Everything one reload compiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LayoutBundle {
    /// Image resources
    pub images: Vec<ImageDef>,
    /// Text font resources
    pub texts: Vec<TextFontDef>,
    /// Background resources
    pub backgrounds: Vec<BackgroundDef>,
    /// Head resources
    pub heads: Vec<HeadDef>,
    /// Layouts
    pub layouts: Vec<LayoutDef>,
    /// HUD displays
    pub huds: Vec<HudDef>,
    /// Popup displays
    pub popups: Vec<PopupDef>,
}

impl Config for LayoutBundle {}

impl LayoutBundle {
    /// Load a bundle file and remember it as the source of its displays
    pub fn load_tagged(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut bundle = Self::load_from_file(path)?;
        let source = path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
        for hud in &mut bundle.huds {
            hud.source.clone_from(&source);
        }
        for popup in &mut bundle.popups {
            popup.source.clone_from(&source);
        }
        Ok(bundle)
    }

    /// Merge another bundle into this one
    pub fn merge(&mut self, other: Self) {
        self.images.extend(other.images);
        self.texts.extend(other.texts);
        self.backgrounds.extend(other.backgrounds);
        self.heads.extend(other.heads);
        self.layouts.extend(other.layouts);
        self.huds.extend(other.huds);
        self.popups.extend(other.popups);
    }
}
