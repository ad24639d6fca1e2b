//! Element renderers
//!
//! Image, text and head elements compile once per location slot and
//! animation frame into a renderer, and each renderer evaluates to a
//! positioned component per subject.

pub mod animation;
pub mod follow;
pub mod head;
pub mod image;
pub mod text;

pub use animation::AnimationType;
pub use follow::{ElementGate, Follow, FollowOutcome};
pub use head::{HeadRenderType, HeadRenderer};
pub use image::ImageRenderer;
pub use text::TextRenderer;

use crate::component::{FontKey, PixelComponent, TextColor};
use crate::definition::{ElementDef, GuiLocation, PixelLocation};
use crate::error::{HudError, HudResult};
use crate::font::{HudShader, NamespaceKind};
use crate::reload::ReloadWarning;
use crate::subject::{RenderContext, Subject};

/// Kind of display an element belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    /// Always-on overlay
    Hud,
    /// Overlay with movable location slots
    Popup,
}

impl DisplayKind {
    /// Codepoint range of the display's image font
    pub const fn namespace(self) -> NamespaceKind {
        match self {
            Self::Hud => NamespaceKind::Image,
            Self::Popup => NamespaceKind::Popup,
        }
    }

    /// Lowercase name, used in font paths
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hud => "hud",
            Self::Popup => "popup",
        }
    }
}

/// The display an element is compiled for
#[derive(Debug, Clone)]
pub struct DisplayScope {
    /// Display kind
    pub kind: DisplayKind,
    /// Display name
    pub name: String,
    /// File the display came from
    pub source: String,
    /// Font holding the display's images and heads
    pub image_font: FontKey,
}

impl DisplayScope {
    /// Scope of the display `name`
    pub fn new(kind: DisplayKind, name: &str, source: &str, namespace: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            source: source.to_string(),
            image_font: FontKey::new(namespace, &format!("{}/{name}/image", kind.label())),
        }
    }

    /// Warning for a skipped element of this display
    pub fn warning(&self, element: impl Into<String>, err: &HudError) -> ReloadWarning {
        ReloadWarning {
            display: self.name.clone(),
            element: element.into(),
            source: self.source.clone(),
            reason: err.to_string(),
        }
    }
}

/// Anchor an element is compiled at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Screen anchor
    pub gui: GuiLocation,
    /// Pixel offset from the anchor, before the element's own location
    pub pixel: PixelLocation,
}

impl Placement {
    /// Top-left anchor without offset
    pub const fn origin() -> Self {
        Self {
            gui: GuiLocation::new(0.0, 0.0),
            pixel: PixelLocation::ZERO,
        }
    }

    /// Final pixel offset and shader of `element`
    pub(crate) fn resolve(&self, element: &ElementDef) -> (PixelLocation, HudShader) {
        let pixel = self.pixel + element.location;
        let shader = HudShader {
            gui: self.gui,
            render_scale: element.render_scale,
            layer: element.layer,
            outline: element.outline,
            opacity: pixel.opacity,
            property: element.property,
        };
        (pixel, shader)
    }
}

/// Parse `#rrggbb` or a colour name
pub fn parse_color(value: &str) -> HudResult<TextColor> {
    TextColor::parse(value)
        .ok_or_else(|| HudError::invalid("color", format!("unknown colour '{value}'")))
}

/// A compiled element
#[derive(Debug, Clone)]
pub enum ElementRenderer {
    /// Image element
    Image(ImageRenderer),
    /// Text element
    Text(TextRenderer),
    /// Head element
    Head(HeadRenderer),
}

impl ElementRenderer {
    /// Positioned component for `subject` at animation `frame`
    pub fn render(
        &self,
        ctx: &RenderContext<'_>,
        subject: &dyn Subject,
        frame: u64,
    ) -> PixelComponent {
        match self {
            Self::Image(image) => image.render(ctx, subject, frame),
            Self::Text(text) => text.render(ctx, subject),
            Self::Head(head) => head.render(ctx, subject),
        }
    }

    /// Width reserved for alignment inside a layout
    pub fn reserved_width(&self) -> i32 {
        match self {
            Self::Image(image) => image.reserved_width(),
            Self::Text(_) | Self::Head(_) => 0,
        }
    }
}
