//! Layout definitions
//!
//! A layout groups image, text and head elements that are placed together
//! and share an animation and a visibility gate.

use serde::{Deserialize, Serialize};

use super::location::{PixelLocation, RenderScale};
use super::ConditionRule;
use crate::config::LegacySerializer;
use crate::element::{AnimationType, HeadRenderType};
use crate::layout::LayoutAlign;

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

fn one_line() -> u32 {
    1
}

fn default_split_width() -> u32 {
    200
}

fn default_line_width() -> i32 {
    10
}

/// Fields every element kind carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ElementDef {
    /// Offset from the layout origin
    #[serde(default)]
    pub location: PixelLocation,
    /// Shader layer
    #[serde(default)]
    pub layer: i32,
    /// Whether the shader draws an outline
    #[serde(default)]
    pub outline: bool,
    /// Shader render scale
    #[serde(default)]
    pub render_scale: RenderScale,
    /// Extra shader property bits
    #[serde(default)]
    pub property: i32,
    /// String placeholder naming another subject to render for
    #[serde(default)]
    pub follow: Option<String>,
    /// Render nothing when the followed subject is missing
    #[serde(default = "yes")]
    pub cancel_if_follower_not_exists: bool,
    /// Visibility rules
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
}

impl Default for ElementDef {
    fn default() -> Self {
        Self {
            location: PixelLocation::ZERO,
            layer: 0,
            outline: false,
            render_scale: RenderScale::default(),
            property: 0,
            follow: None,
            cancel_if_follower_not_exists: true,
            conditions: Vec::new(),
        }
    }
}

/// Image element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageLayoutDef {
    /// Image resource name
    pub image: String,
    /// Image scale
    #[serde(default = "one")]
    pub scale: f64,
    /// Tint as `#rrggbb` or a colour name
    #[serde(default)]
    pub color: Option<String>,
    /// Gap between stacked repeats
    #[serde(default)]
    pub space: i32,
    /// Number placeholder giving the repeat count
    #[serde(default)]
    pub stack: Option<String>,
    /// Upper bound for the repeat count, 0 = unbounded
    #[serde(default)]
    pub max_stack: u32,
    /// Shared element fields
    #[serde(flatten)]
    pub element: ElementDef,
}

/// Text element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextLayoutDef {
    /// Text font resource name
    pub name: String,
    /// Pattern with placeholders, inline tags and markup
    pub pattern: String,
    /// Glyph scale
    #[serde(default = "one")]
    pub scale: f64,
    /// Inter-character spacer in pixels
    #[serde(default)]
    pub space: i32,
    /// Alignment of the whole text block around its origin
    #[serde(default)]
    pub align: LayoutAlign,
    /// Alignment of stacked lines against each other
    #[serde(default)]
    pub line_align: LayoutAlign,
    /// Default colour
    #[serde(default)]
    pub color: Option<String>,
    /// Equation applied to numbers before formatting, variable `t`
    #[serde(default)]
    pub number_equation: Option<String>,
    /// Number format pattern
    #[serde(default)]
    pub number_format: Option<String>,
    /// Turn automatic number reformatting off
    #[serde(default)]
    pub disable_number_format: Option<bool>,
    /// Background resource name
    #[serde(default)]
    pub background: Option<String>,
    /// Background scale, defaults to `scale`
    #[serde(default)]
    pub background_scale: Option<f64>,
    /// Extra offset applied to inline icons
    #[serde(default)]
    pub emoji_pixel: PixelLocation,
    /// Extra scale applied to inline icons
    #[serde(default = "one")]
    pub emoji_scale: f64,
    /// Translate legacy colour codes
    #[serde(default)]
    pub use_legacy_format: Option<bool>,
    /// Legacy colour-code prefix
    #[serde(default)]
    pub legacy_serializer: Option<LegacySerializer>,
    /// Maximum number of lines
    #[serde(default = "one_line")]
    pub line: u32,
    /// Width budget of one line, only used with more than one line
    #[serde(default = "default_split_width")]
    pub split_width: u32,
    /// Vertical distance between lines
    #[serde(default = "default_line_width")]
    pub line_width: i32,
    /// Shared element fields
    #[serde(flatten)]
    pub element: ElementDef,
}

/// Head element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HeadLayoutDef {
    /// Head resource name
    pub name: String,
    /// Alignment around the origin
    #[serde(default)]
    pub align: LayoutAlign,
    /// Standard or fancy (with hair layer)
    #[serde(default, rename = "type")]
    pub kind: HeadRenderType,
    /// Shared element fields
    #[serde(flatten)]
    pub element: ElementDef,
}

/// Frame list of a layout animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnimationDef {
    /// How the frame counter maps onto the frame list
    #[serde(default, rename = "type")]
    pub kind: AnimationType,
    /// Offset of each frame
    #[serde(default = "single_frame")]
    pub frames: Vec<PixelLocation>,
}

fn single_frame() -> Vec<PixelLocation> {
    vec![PixelLocation::ZERO]
}

impl Default for AnimationDef {
    fn default() -> Self {
        Self {
            kind: AnimationType::default(),
            frames: single_frame(),
        }
    }
}

/// A group of elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutDef {
    /// Layout name
    pub name: String,
    /// Image elements
    #[serde(default)]
    pub images: Vec<ImageLayoutDef>,
    /// Text elements
    #[serde(default)]
    pub texts: Vec<TextLayoutDef>,
    /// Head elements
    #[serde(default)]
    pub heads: Vec<HeadLayoutDef>,
    /// Alignment of elements inside the group box
    #[serde(default)]
    pub align: LayoutAlign,
    /// Position of the group box relative to its anchor
    #[serde(default)]
    pub offset: LayoutAlign,
    /// Frame animation
    #[serde(default)]
    pub animation: AnimationDef,
    /// Gate for the whole group
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
}
