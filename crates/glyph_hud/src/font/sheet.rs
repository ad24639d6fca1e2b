//! Glyph sheet measuring
//!
//! A sheet is a grid: one texture row per entry of the font's `chars`, each
//! row split evenly between its characters. A glyph is as wide as its
//! rightmost non-transparent column plus one; blank cells are zero wide.

use std::collections::HashMap;

use image::RgbaImage;

use super::char_width::CharWidth;
use crate::error::{HudError, HudResult};

/// Measured glyph sizes of a sheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetMetrics {
    /// Cell height
    pub height: u32,
    /// Size per character
    pub widths: HashMap<char, CharWidth>,
}

/// Measure every glyph of `sheet`
pub fn measure(sheet: &RgbaImage, rows: &[String], cell_height: Option<u32>) -> HudResult<SheetMetrics> {
    let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
    if row_count == 0 {
        return Err(HudError::invalid("chars", "a glyph sheet needs at least one row"));
    }
    let height = cell_height.unwrap_or(sheet.height() / row_count);
    if height == 0 || height * row_count > sheet.height() {
        return Err(HudError::invalid(
            "height",
            format!("{} rows of {height}px do not fit a {}px sheet", row_count, sheet.height()),
        ));
    }

    let mut widths = HashMap::new();
    for (row, chars) in (0..).zip(rows) {
        let count = u32::try_from(chars.chars().count()).unwrap_or(u32::MAX);
        if count == 0 {
            continue;
        }
        let cell_width = sheet.width() / count;
        for (column, ch) in (0..).zip(chars.chars()) {
            let x0 = column * cell_width;
            let y0 = row * height;
            let width = (0..cell_width)
                .rev()
                .find(|&dx| (0..height).any(|dy| sheet.get_pixel(x0 + dx, y0 + dy)[3] != 0))
                .map_or(0, |dx| dx + 1);
            widths.insert(ch, CharWidth::new(width, height));
        }
    }
    Ok(SheetMetrics { height, widths })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sheet() -> RgbaImage {
        // 2 rows of 8px cells: "ab" and "c"
        let mut img = RgbaImage::new(16, 16);
        for y in 0..8 {
            for x in 0..5 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
            img.put_pixel(8 + 2, y, Rgba([255, 255, 255, 255]));
        }
        img.put_pixel(13, 12, Rgba([0, 0, 0, 10]));
        img
    }

    #[test]
    fn test_widths_from_rightmost_opaque_column() {
        let rows = vec!["ab".to_string(), "c".to_string()];
        let metrics = measure(&sheet(), &rows, None).unwrap();
        assert_eq!(metrics.height, 8);
        assert_eq!(metrics.widths[&'a'], CharWidth::new(5, 8));
        assert_eq!(metrics.widths[&'b'], CharWidth::new(3, 8));
        assert_eq!(metrics.widths[&'c'], CharWidth::new(14, 8));
    }

    #[test]
    fn test_blank_cells_are_zero_wide() {
        let rows = vec!["xy".to_string()];
        let metrics = measure(&RgbaImage::new(8, 8), &rows, None).unwrap();
        assert_eq!(metrics.widths[&'x'].width, 0);
        assert_eq!(metrics.widths[&'y'].width, 0);
    }

    #[test]
    fn test_oversized_cells_are_rejected() {
        let rows = vec!["a".to_string()];
        assert!(measure(&RgbaImage::new(8, 8), &rows, Some(16)).is_err());
        assert!(measure(&RgbaImage::new(8, 8), &[], None).is_err());
    }
}
