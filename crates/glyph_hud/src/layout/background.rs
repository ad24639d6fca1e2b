//! Tiled text backgrounds
//!
//! A background is a left cap, a body repeated until the content fits, and a
//! right cap. The content is centred inside the tiles and the cursor ends at
//! the right edge of the background.

use crate::component::WidthComponent;

/// Bound glyphs of one background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundGlyphs {
    /// Horizontal shift of the tiles
    pub x: i32,
    /// Left cap, net width = cap width
    pub left: WidthComponent,
    /// Repeated body, net width > 0
    pub body: WidthComponent,
    /// Right cap, net width = cap width
    pub right: WidthComponent,
}

impl BackgroundGlyphs {
    /// Smallest body repeat count with `left + n * body + right >= content`
    pub fn repeat_count(&self, content: i32) -> i32 {
        let body = self.body.width().max(1);
        let remaining = content - self.left.width() - self.right.width();
        if remaining <= 0 {
            0
        } else {
            (remaining + body - 1) / body
        }
    }

    /// Total tile width for `content`
    pub fn total_width(&self, content: i32) -> i32 {
        self.left.width() + self.repeat_count(content) * self.body.width() + self.right.width()
    }

    /// Draw `content` on top of the tiles
    pub fn wrap(&self, content: WidthComponent) -> WidthComponent {
        let width = content.width();
        let total = self.total_width(width);
        let pad = (total - width) / 2;

        let mut tiles = self.left.clone();
        for _ in 0..self.repeat_count(width) {
            tiles += self.body.clone();
        }
        tiles += self.right.clone();

        WidthComponent::space(self.x)
            + tiles
            + WidthComponent::space(-(self.x + total) + pad)
            + content
            + WidthComponent::space(total - pad - width)
    }
}
