//! Display definitions
//!
//! A HUD is always on screen; a popup can be shown several times at once,
//! each instance occupying the next of its move locations.

use serde::{Deserialize, Serialize};

use super::location::{GuiLocation, PixelLocation};

/// Placement of a layout inside a display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutRef {
    /// Layout name
    pub name: String,
    /// Screen anchor
    #[serde(default)]
    pub gui: GuiLocation,
    /// Pixel offset from the anchor
    #[serde(default)]
    pub pixel: PixelLocation,
}

/// One slot a popup instance can occupy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocationGroupDef {
    /// Screen anchor shift
    #[serde(default)]
    pub gui: GuiLocation,
    /// Pixel shift
    #[serde(default)]
    pub pixel: PixelLocation,
}

/// An always-visible display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HudDef {
    /// Display name
    pub name: String,
    /// Layouts in draw order
    pub layouts: Vec<LayoutRef>,
    /// File the definition was loaded from
    #[serde(skip)]
    pub source: String,
}

/// A display shown on demand in one of several slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PopupDef {
    /// Display name
    pub name: String,
    /// Screen anchor of the whole popup
    #[serde(default)]
    pub gui: GuiLocation,
    /// Slots, addressed by index
    #[serde(default = "single_slot")]
    pub move_locations: Vec<LocationGroupDef>,
    /// Layouts in draw order
    pub layouts: Vec<LayoutRef>,
    /// File the definition was loaded from
    #[serde(skip)]
    pub source: String,
}

fn single_slot() -> Vec<LocationGroupDef> {
    vec![LocationGroupDef::default()]
}
