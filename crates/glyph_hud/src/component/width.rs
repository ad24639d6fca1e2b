//! Width components
//!
//! The client places glyphs left to right and never reports back how wide
//! anything was, so every component carries its own width. Negative spacers
//! are how layouts move the cursor back to draw overlapping elements.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::style::{FontKey, Style};

/// Codepoint of the zero-width spacer in the space font
///
/// A spacer of width `n` is the codepoint `SPACE_CENTER_CODEPOINT + n`.
pub const SPACE_CENTER_CODEPOINT: u32 = 0xD0000;

/// One entry of the rendered glyph sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Glyph {
    /// A codepoint drawn with a style
    Char {
        /// Codepoint bound in `style.font`
        codepoint: u32,
        /// Font, tint and decorations
        style: Style,
    },
    /// Signed cursor movement without a visible glyph
    Space(i32),
}

impl Glyph {
    /// Codepoint the host emits for this glyph
    pub fn codepoint(&self) -> u32 {
        match self {
            Self::Char { codepoint, .. } => *codepoint,
            Self::Space(n) => SPACE_CENTER_CODEPOINT.wrapping_add_signed(*n),
        }
    }

    /// Character the host emits, `None` for codepoints outside the scalar range
    pub fn to_char(&self) -> Option<char> {
        char::from_u32(self.codepoint())
    }

    /// Style the host emits; spacers live in the space font
    pub fn style(&self, namespace: &str) -> Style {
        match self {
            Self::Char { style, .. } => style.clone(),
            Self::Space(_) => Style::default().with_font(FontKey::space(namespace)),
        }
    }
}

/// A run of glyphs with a known pixel width
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidthComponent {
    glyphs: Vec<Glyph>,
    width: i32,
}

impl WidthComponent {
    /// The empty component
    pub const fn empty() -> Self {
        Self {
            glyphs: Vec::new(),
            width: 0,
        }
    }

    /// Wrap raw glyphs with an explicit width
    pub fn new(glyphs: Vec<Glyph>, width: i32) -> Self {
        Self { glyphs, width }
    }

    /// A single styled codepoint advancing the cursor by `width`
    pub fn glyph(codepoint: u32, style: Style, width: i32) -> Self {
        Self {
            glyphs: vec![Glyph::Char { codepoint, style }],
            width,
        }
    }

    /// A spacer of signed width `n`
    pub fn space(n: i32) -> Self {
        if n == 0 {
            return Self::empty();
        }
        Self {
            glyphs: vec![Glyph::Space(n)],
            width: n,
        }
    }

    /// Net cursor advance in pixels
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Rendered glyph sequence
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Whether nothing would be emitted
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty() && self.width == 0
    }

    /// Append another component, merging touching spacers
    pub fn append(&mut self, other: Self) {
        self.width += other.width;
        let mut incoming = other.glyphs.into_iter().peekable();
        if let Some(Glyph::Space(last)) = self.glyphs.last() {
            if let Some(&Glyph::Space(first)) = incoming.peek() {
                let merged = *last + first;
                incoming.next();
                self.glyphs.pop();
                if merged != 0 {
                    self.glyphs.push(Glyph::Space(merged));
                }
            }
        }
        self.glyphs.extend(incoming);
    }

    /// Append a spacer of width `n`
    pub fn push_space(&mut self, n: i32) {
        self.append(Self::space(n));
    }

    /// Bind every unbound codepoint to `font`
    pub fn with_font(mut self, font: &FontKey) -> Self {
        for glyph in &mut self.glyphs {
            if let Glyph::Char { style, .. } = glyph {
                if style.font.is_none() {
                    style.font = Some(font.clone());
                }
            }
        }
        self
    }

    /// Split spacers wider than `range` into runs the space font declares
    ///
    /// The net width is unchanged.
    #[must_use]
    pub fn fit_spaces(mut self, range: i32) -> Self {
        let fits = |g: &Glyph| !matches!(g, Glyph::Space(n) if n.abs() > range);
        if range <= 0 || self.glyphs.iter().all(fits) {
            return self;
        }
        let mut glyphs = Vec::with_capacity(self.glyphs.len());
        for glyph in self.glyphs.drain(..) {
            match glyph {
                Glyph::Space(mut n) if n.abs() > range => {
                    while n != 0 {
                        let step = n.clamp(-range, range);
                        glyphs.push(Glyph::Space(step));
                        n -= step;
                    }
                }
                other => glyphs.push(other),
            }
        }
        self.glyphs = glyphs;
        self
    }

    /// Bind this component to a horizontal origin
    pub fn to_pixel(self, x: i32) -> PixelComponent {
        PixelComponent { component: self, x }
    }
}

impl Add for WidthComponent {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.append(rhs);
        self
    }
}

impl AddAssign for WidthComponent {
    fn add_assign(&mut self, rhs: Self) {
        self.append(rhs);
    }
}

impl Sum for WidthComponent {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::empty(), Add::add)
    }
}

/// A component bound to a horizontal origin relative to its element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelComponent {
    component: WidthComponent,
    x: i32,
}

impl PixelComponent {
    /// The empty positioned component
    pub const fn empty() -> Self {
        Self {
            component: WidthComponent::empty(),
            x: 0,
        }
    }

    /// Horizontal origin
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Width of the bound component
    pub fn width(&self) -> i32 {
        self.component.width()
    }

    /// Bound component
    pub fn component(&self) -> &WidthComponent {
        &self.component
    }

    /// Whether nothing would be emitted
    pub fn is_empty(&self) -> bool {
        self.component.is_empty()
    }

    /// Move the origin by `dx`
    pub fn shifted(mut self, dx: i32) -> Self {
        self.x += dx;
        self
    }

    /// Component drawn at its origin with the cursor returned to where it started
    pub fn overlay(&self) -> WidthComponent {
        if self.is_empty() {
            return WidthComponent::empty();
        }
        WidthComponent::space(self.x)
            + self.component.clone()
            + WidthComponent::space(-self.x - self.component.width())
    }

    /// Unwrap the component
    pub fn into_component(self) -> WidthComponent {
        self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(c: char, width: i32) -> WidthComponent {
        WidthComponent::glyph(c as u32, Style::default(), width)
    }

    #[test]
    fn test_concat_is_width_additive() {
        let a = letter('a', 6) + WidthComponent::space(-3);
        let b = letter('b', 5) + WidthComponent::space(2);
        assert_eq!((a.clone() + b.clone()).width(), a.width() + b.width());
    }

    #[test]
    fn test_concat_is_associative() {
        let a = letter('a', 6);
        let b = WidthComponent::space(4);
        let c = WidthComponent::space(-1) + letter('c', 2);
        assert_eq!((a.clone() + b.clone()) + c.clone(), a + (b + c));
    }

    #[test]
    fn test_adjacent_spaces_merge() {
        let merged = WidthComponent::space(5) + WidthComponent::space(-2);
        assert_eq!(merged.glyphs(), &[Glyph::Space(3)]);

        let cancelled = letter('x', 4) + WidthComponent::space(5) + WidthComponent::space(-5);
        assert_eq!(cancelled.glyphs().len(), 1);
        assert_eq!(cancelled.width(), 4);
    }

    #[test]
    fn test_space_has_no_visible_glyph() {
        assert!(WidthComponent::space(0).is_empty());
        let space = WidthComponent::space(-7);
        assert_eq!(space.width(), -7);
        assert_eq!(space.glyphs()[0].codepoint(), SPACE_CENTER_CODEPOINT - 7);
    }

    #[test]
    fn test_wide_spaces_split_into_declared_range() {
        let comp = letter('a', 4) + WidthComponent::space(-21) + letter('b', 3);
        let fitted = comp.clone().fit_spaces(8);
        assert_eq!(fitted.width(), comp.width());
        let spaces: Vec<_> = fitted
            .glyphs()
            .iter()
            .filter_map(|g| match g {
                Glyph::Space(n) => Some(*n),
                Glyph::Char { .. } => None,
            })
            .collect();
        assert_eq!(spaces, vec![-8, -8, -5]);

        let narrow = WidthComponent::space(8);
        assert_eq!(narrow.clone().fit_spaces(8), narrow);
    }

    #[test]
    fn test_overlay_returns_cursor() {
        let pixel = letter('a', 6).to_pixel(10);
        let overlay = pixel.overlay();
        assert_eq!(overlay.width(), 0);
        assert_eq!(overlay.glyphs().first(), Some(&Glyph::Space(10)));
        assert!(PixelComponent::empty().overlay().is_empty());
    }

    #[test]
    fn test_with_font_only_binds_unbound_glyphs() {
        let bound = FontKey::new("hud", "image");
        let line = FontKey::new("hud", "text_1_1");
        let comp = WidthComponent::glyph(1, Style::default().with_font(bound.clone()), 3)
            + letter('a', 4)
            + WidthComponent::space(2);
        let comp = comp.with_font(&line);
        let fonts: Vec<_> = comp
            .glyphs()
            .iter()
            .filter_map(|g| match g {
                Glyph::Char { style, .. } => style.font.clone(),
                Glyph::Space(_) => None,
            })
            .collect();
        assert_eq!(fonts, vec![bound, line]);
    }
}
