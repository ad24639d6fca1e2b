//! Placement primitives shared by every definition

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Screen-relative anchor in percent of the client window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiLocation {
    /// Horizontal percent, 0 = left edge
    pub x: f64,
    /// Vertical percent, 0 = top edge
    pub y: f64,
}

impl GuiLocation {
    /// Create a new location
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for GuiLocation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Pixel offset from an anchor, plus an opacity multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelLocation {
    /// Horizontal pixels
    pub x: i32,
    /// Vertical pixels, becomes the glyph ascent
    pub y: i32,
    /// Opacity in `0.0..=1.0`
    pub opacity: f64,
}

impl PixelLocation {
    /// Origin with full opacity
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        opacity: 1.0,
    };

    /// Create a fully opaque offset
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, opacity: 1.0 }
    }
}

impl Default for PixelLocation {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for PixelLocation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            opacity: self.opacity * rhs.opacity,
        }
    }
}

/// Per-axis render scale applied by the client shader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderScale {
    /// Horizontal factor
    pub x: f64,
    /// Vertical factor
    pub y: f64,
}

impl RenderScale {
    /// Both axes scaled by `factor`
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl Default for RenderScale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}
