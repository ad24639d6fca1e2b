//! Glyph metrics

use crate::definition::PixelLocation;

/// Declared size of a source glyph in source pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharWidth {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl CharWidth {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Displayed width at `scale`
    #[allow(clippy::cast_possible_truncation)]
    pub fn scaled_width(self, scale: f64) -> i32 {
        (f64::from(self.width) * scale).round() as i32
    }

    /// Displayed height at `scale`
    #[allow(clippy::cast_possible_truncation)]
    pub fn scaled_height(self, scale: f64) -> i32 {
        (f64::from(self.height) * scale).round() as i32
    }
}

/// An inline icon usable inside text
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCharWidth {
    /// Name used by `<image:NAME>`
    pub name: String,
    /// Texture reference, `namespace:path`
    pub file: String,
    /// Placement relative to the line
    pub location: PixelLocation,
    /// Scale on top of the text and emoji scales
    pub scale: f64,
    /// Source size
    pub size: CharWidth,
}

impl ImageCharWidth {
    /// Displayed width for a text drawn at `scale`
    pub fn scaled_width(&self, scale: f64) -> i32 {
        self.size.scaled_width(scale * self.scale)
    }

    /// Displayed height for a text drawn at `scale`
    pub fn scaled_height(&self, scale: f64) -> i32 {
        self.size.scaled_height(scale * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_rounds_half_away_from_zero() {
        let size = CharWidth::new(5, 8);
        assert_eq!(size.scaled_width(1.0), 5);
        assert_eq!(size.scaled_width(1.5), 8);
        assert_eq!(size.scaled_height(0.5), 4);

        let icon = ImageCharWidth {
            name: "coin".to_string(),
            file: "hud:icon/coin.png".to_string(),
            location: PixelLocation::ZERO,
            scale: 2.0,
            size: CharWidth::new(7, 7),
        };
        assert_eq!(icon.scaled_width(0.5), 7);
        assert_eq!(icon.scaled_height(1.0), 14);
    }
}
