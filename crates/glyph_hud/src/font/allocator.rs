//! Codepoint allocation
//!
//! Each font file owns a counter in one of three disjoint private-use ranges,
//! so glyphs allocated for different fonts never collide even when the host
//! merges them into one namespace.

use std::collections::HashMap;

use crate::component::{FontKey, Style, WidthComponent};
use crate::error::{HudError, HudResult};

/// Codepoint of the inter-character spacer inside text line fonts
pub const TEXT_SPACE_CODEPOINT: u32 = 0xC0000;

/// Allocation scope of a font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// Image font of a HUD
    Image,
    /// Image font of a popup
    Popup,
    /// Icons and backgrounds of one text line font
    TextLine,
}

impl NamespaceKind {
    /// Reserved start; the first allocated codepoint is `start + 1`
    pub const fn start(self) -> u32 {
        match self {
            Self::Image => 0xF0000,
            Self::Popup => 0x0010_0000,
            Self::TextLine => TEXT_SPACE_CODEPOINT,
        }
    }

    /// Last usable codepoint
    pub const fn end(self) -> u32 {
        match self {
            Self::Image => 0xFFFFD,
            Self::Popup => 0x0010_FFFD,
            Self::TextLine => 0xCFFFF,
        }
    }
}

/// Monotonic counter of one font
#[derive(Debug, Clone)]
pub struct CodepointAllocator {
    kind: NamespaceKind,
    next: u32,
}

impl CodepointAllocator {
    /// Fresh counter at the reserved start
    pub const fn new(kind: NamespaceKind) -> Self {
        Self {
            kind,
            next: kind.start(),
        }
    }

    /// Next free codepoint
    pub fn allocate(&mut self) -> HudResult<u32> {
        if self.next >= self.kind.end() {
            return Err(HudError::invalid(
                "codepoint",
                format!("{:?} range is exhausted", self.kind),
            ));
        }
        self.next += 1;
        Ok(self.next)
    }

    /// Codepoints still free
    pub const fn remaining(&self) -> u32 {
        self.kind.end() - self.next
    }

    /// Number of codepoints handed out
    pub const fn allocated(&self) -> u32 {
        self.next - self.kind.start()
    }
}

/// Counters of every font touched by one reload
#[derive(Debug, Default)]
pub struct NamespaceTable {
    allocators: HashMap<FontKey, CodepointAllocator>,
}

impl NamespaceTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Next codepoint of `font`, creating its counter on first use
    pub fn allocate(&mut self, font: &FontKey, kind: NamespaceKind) -> HudResult<u32> {
        let codepoint = self
            .allocators
            .entry(font.clone())
            .or_insert_with(|| CodepointAllocator::new(kind))
            .allocate()?;
        log::trace!("allocated U+{codepoint:X} in {font}");
        Ok(codepoint)
    }

    /// Fail unless `font` can still hand out `count` codepoints
    pub fn reserve(&self, font: &FontKey, kind: NamespaceKind, count: u32) -> HudResult<()> {
        let remaining = self
            .allocators
            .get(font)
            .map_or_else(|| CodepointAllocator::new(kind).remaining(), CodepointAllocator::remaining);
        if remaining < count {
            return Err(HudError::invalid(
                "codepoint",
                format!("{kind:?} range of {font} cannot fit {count} more glyphs"),
            ));
        }
        Ok(())
    }

    /// Total codepoints handed out
    pub fn total(&self) -> u32 {
        self.allocators.values().map(CodepointAllocator::allocated).sum()
    }
}

/// A codepoint bound to a bitmap with a known displayed width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBinding {
    /// Font holding the bitmap record
    pub font: FontKey,
    /// Allocated codepoint
    pub codepoint: u32,
    /// Displayed width in pixels
    pub width: i32,
}

impl GlyphBinding {
    /// The bitmap followed by a one pixel retreat, net width `width`
    ///
    /// The client always adds one pixel after a bitmap glyph.
    pub fn component(&self, style: Style) -> WidthComponent {
        WidthComponent::glyph(self.codepoint, style.with_font(self.font.clone()), self.width + 1)
            + WidthComponent::space(-1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_are_disjoint() {
        let kinds = [NamespaceKind::Image, NamespaceKind::Popup, NamespaceKind::TextLine];
        for a in kinds {
            for b in kinds {
                if a != b {
                    assert!(a.end() < b.start() || b.end() < a.start(), "{a:?} / {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_counters_are_per_font() {
        let mut table = NamespaceTable::new();
        let a = FontKey::new("hud", "popup/a/image");
        let b = FontKey::new("hud", "popup/b/image");
        assert_eq!(table.allocate(&a, NamespaceKind::Popup).unwrap(), 0x10_0001);
        assert_eq!(table.allocate(&a, NamespaceKind::Popup).unwrap(), 0x10_0002);
        assert_eq!(table.allocate(&b, NamespaceKind::Popup).unwrap(), 0x10_0001);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut allocator = CodepointAllocator {
            kind: NamespaceKind::TextLine,
            next: NamespaceKind::TextLine.end() - 1,
        };
        assert_eq!(allocator.allocate().unwrap(), NamespaceKind::TextLine.end());
        assert!(allocator.allocate().is_err());
    }

    #[test]
    fn test_reserve_checks_remaining_room() {
        let mut table = NamespaceTable::new();
        let font = FontKey::new("hud", "text/default/0");
        let room = NamespaceKind::TextLine.end() - NamespaceKind::TextLine.start();
        assert!(table.reserve(&font, NamespaceKind::TextLine, room).is_ok());
        table.allocate(&font, NamespaceKind::TextLine).unwrap();
        assert!(table.reserve(&font, NamespaceKind::TextLine, room).is_err());
        assert!(table.reserve(&font, NamespaceKind::TextLine, room - 1).is_ok());
        assert_eq!(table.total(), 1);
    }

    #[test]
    fn test_binding_component_nets_declared_width() {
        let binding = GlyphBinding {
            font: FontKey::new("hud", "hud/main/image"),
            codepoint: 0xF0001,
            width: 9,
        };
        let comp = binding.component(Style::default());
        assert_eq!(comp.width(), 9);
        assert_eq!(comp.glyphs().len(), 2);
    }
}
