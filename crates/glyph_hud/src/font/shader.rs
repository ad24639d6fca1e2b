//! Visual parameters
//!
//! Two bindings with equal visual parameters draw the same pixels at the same
//! place, so they can share one codepoint. Floats are compared bit-for-bit.

use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::definition::{GuiLocation, RenderScale};

/// Shader inputs of a bound glyph
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HudShader {
    /// Screen anchor
    pub gui: GuiLocation,
    /// Per-axis render scale
    pub render_scale: RenderScale,
    /// Draw layer
    pub layer: i32,
    /// Outline flag
    pub outline: bool,
    /// Opacity in `0.0..=1.0`
    pub opacity: f64,
    /// Extra property bits
    pub property: i32,
}

impl HudShader {
    fn bits(&self) -> (u64, u64, u64, u64, i32, bool, u64, i32) {
        (
            self.gui.x.to_bits(),
            self.gui.y.to_bits(),
            self.render_scale.x.to_bits(),
            self.render_scale.y.to_bits(),
            self.layer,
            self.outline,
            self.opacity.to_bits(),
            self.property,
        )
    }
}

impl PartialEq for HudShader {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for HudShader {}

impl Hash for HudShader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

/// Visual parameters of one binding: shader, source, scale and ascent
#[derive(Debug, Clone)]
pub struct ShaderGroup {
    /// Shader inputs
    pub shader: HudShader,
    /// Source file or font name
    pub source: String,
    /// Image scale
    pub scale: f64,
    /// Requested ascent before clamping
    pub ascent: i32,
}

impl ShaderGroup {
    /// Group the parameters
    pub fn new(shader: HudShader, source: impl Into<String>, scale: f64, ascent: i32) -> Self {
        Self {
            shader,
            source: source.into(),
            scale,
            ascent,
        }
    }
}

impl PartialEq for ShaderGroup {
    fn eq(&self, other: &Self) -> bool {
        self.shader == other.shader
            && self.source == other.source
            && self.scale.to_bits() == other.scale.to_bits()
            && self.ascent == other.ascent
    }
}

impl Eq for ShaderGroup {}

impl Hash for ShaderGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shader.hash(state);
        self.source.hash(state);
        self.scale.to_bits().hash(state);
        self.ascent.hash(state);
    }
}
