//! Width algebra
//!
//! Everything the engine renders ends up as a [`WidthComponent`]: an ordered
//! run of glyphs together with the exact number of pixels the client cursor
//! advances when drawing it. Components concatenate additively, and signed
//! spacers move the cursor without drawing anything.

pub mod style;
pub mod width;

pub use style::{Decorations, FontKey, NamedColor, Style, TextColor};
pub use width::{Glyph, PixelComponent, WidthComponent, SPACE_CENTER_CODEPOINT};
