//! Horizontal alignment

use serde::{Deserialize, Serialize};

/// Alignment of a box around its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAlign {
    /// Origin at the left edge
    #[default]
    Left,
    /// Origin at the centre
    Center,
    /// Origin at the right edge
    Right,
}

impl LayoutAlign {
    /// Shift of the left edge for a box `max` wide
    pub const fn origin_offset(self, max: i32) -> i32 {
        match self {
            Self::Left => 0,
            Self::Center => -max / 2,
            Self::Right => -max,
        }
    }

    /// Left edge of an item `width` wide placed at `x` inside a box `max` wide
    pub const fn place(self, x: i32, max: i32, width: i32) -> i32 {
        match self {
            Self::Left => x,
            Self::Center => x + (max - width) / 2,
            Self::Right => x + max - width,
        }
    }
}
