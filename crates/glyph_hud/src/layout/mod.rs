//! Line layout engine
//!
//! Splitting styled characters into lines, aligning lines against each
//! other and tiling backgrounds behind them.

pub mod align;
pub mod background;
pub mod line;

pub use align::LayoutAlign;
pub use background::BackgroundGlyphs;
pub use line::{stack_lines, IconGlyph, LineBreaker, LineMetrics, Measured, SPACE_ADVANCE};
