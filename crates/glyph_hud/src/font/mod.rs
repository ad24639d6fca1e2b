//! Glyph packing
//!
//! Codepoint allocation, visual-parameter dedup keys, descriptor records and
//! glyph metrics.

pub mod allocator;
pub mod char_width;
pub mod descriptor;
pub mod shader;
pub mod sheet;

pub use allocator::{
    CodepointAllocator, GlyphBinding, NamespaceKind, NamespaceTable, TEXT_SPACE_CODEPOINT,
};
pub use char_width::{CharWidth, ImageCharWidth};
pub use descriptor::{create_bit, DescriptorEmitter, FontDocument, Provider};
pub use shader::{HudShader, ShaderGroup};
pub use sheet::{measure, SheetMetrics};
