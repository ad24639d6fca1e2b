//! Layout boxes
//!
//! Elements of one layout share a box as wide as the widest of them, or as
//! the width their image elements reserve. Each element is aligned inside
//! the box and the box itself is shifted around the layout origin.

use crate::component::{PixelComponent, WidthComponent};
use crate::layout::LayoutAlign;

/// Positioned elements of one layout, collected before the box width is known
#[derive(Debug, Clone)]
pub struct LayoutComponentContainer {
    offset: LayoutAlign,
    align: LayoutAlign,
    max: i32,
    items: Vec<PixelComponent>,
}

impl LayoutComponentContainer {
    /// Empty box at least `reserved` wide
    pub fn new(offset: LayoutAlign, align: LayoutAlign, reserved: i32) -> Self {
        Self {
            offset,
            align,
            max: reserved.max(0),
            items: Vec::new(),
        }
    }

    /// Add rendered elements; empty ones take no room
    #[must_use]
    pub fn append(mut self, items: impl IntoIterator<Item = PixelComponent>) -> Self {
        for item in items {
            if item.is_empty() {
                continue;
            }
            self.max = self.max.max(item.width());
            self.items.push(item);
        }
        self
    }

    /// Current box width
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Overlay every element and advance over the box
    ///
    /// The result starts at the box's left edge and is exactly `max` wide.
    pub fn build(self) -> PixelComponent {
        let max = self.max;
        let mut out = WidthComponent::empty();
        for item in self.items {
            let x = self.align.place(item.x(), max, item.width());
            let width = item.width();
            out += item.into_component().to_pixel(x).overlay();
            log::trace!("placed element at {x} ({width} wide) in a {max} wide box");
        }
        out.push_space(max);
        out.to_pixel(self.offset.origin_offset(max))
    }
}
