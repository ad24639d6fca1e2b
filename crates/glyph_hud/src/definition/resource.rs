//! Resource definitions
//!
//! Images, text fonts, backgrounds and heads are declared once and referenced
//! by name from layouts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::location::PixelLocation;
use super::ConditionRule;

fn one() -> f64 {
    1.0
}

/// A bitmap file with optionally declared dimensions
///
/// Missing dimensions are probed from the file when the bundle is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BitmapDef {
    /// Texture path relative to the resource namespace, e.g. `image/heart.png`
    pub file: String,
    /// Source width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Source height in pixels
    #[serde(default)]
    pub height: Option<u32>,
}

/// One frame of an image resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrameDef {
    /// Bitmap of this frame
    #[serde(flatten)]
    pub bitmap: BitmapDef,
    /// Horizontal shift applied to this frame, in source pixels
    #[serde(default)]
    pub x_offset: i32,
}

/// A named image: a single frame, an animated sequence, or listener-driven
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageDef {
    /// Resource name
    pub name: String,
    /// Frames in display order
    pub frames: Vec<FrameDef>,
    /// Number placeholder in `0.0..=1.0` picking a frame, frame 0 being empty
    #[serde(default)]
    pub listener: Option<String>,
    /// Visibility rules shared by every use of this image
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
}

/// Inline icon usable inside text as `<image:NAME>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IconDef {
    /// Name referenced by the inline tag
    pub name: String,
    /// Bitmap of the icon
    #[serde(flatten)]
    pub bitmap: BitmapDef,
    /// Extra scale applied on top of the text scale
    #[serde(default = "one")]
    pub scale: f64,
    /// Placement relative to the text baseline
    #[serde(default)]
    pub pixel: PixelLocation,
}

/// A bitmap glyph sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextFontDef {
    /// Resource name
    pub name: String,
    /// Sheet texture, one row of cells per entry in `chars`
    pub file: String,
    /// Characters of each sheet row
    pub chars: Vec<String>,
    /// Cell height in source pixels, probed from the sheet when missing
    #[serde(default)]
    pub height: Option<u32>,
    /// Declared glyph widths keyed by single-character strings; characters
    /// not listed are measured from the sheet
    #[serde(default)]
    pub widths: IndexMap<String, u32>,
    /// Inline icons
    #[serde(default)]
    pub icons: Vec<IconDef>,
    /// Visibility rules shared by every use of this font
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
}

/// A tileable text background: left cap, repeated body, right cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackgroundDef {
    /// Resource name
    pub name: String,
    /// Left cap
    pub left: BitmapDef,
    /// Repeated body
    pub body: BitmapDef,
    /// Right cap
    pub right: BitmapDef,
    /// Placement relative to the text line
    #[serde(default)]
    pub location: PixelLocation,
}

/// A player head portrait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HeadDef {
    /// Resource name
    pub name: String,
    /// Size of one skin pixel on screen
    pub pixel: i32,
    /// Visibility rules shared by every use of this head
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
}
