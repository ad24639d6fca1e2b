//! Line layout
//!
//! Measured glyphs are split greedily into lines that fit a width budget,
//! then stacked on top of each other. Every line ends with the cursor back at
//! the shared origin before the next one is drawn, so the stacked width is
//! the width of the widest line.

use std::collections::HashMap;

use crate::component::{Style, WidthComponent};
use crate::font::{CharWidth, TEXT_SPACE_CODEPOINT};
use crate::layout::LayoutAlign;
use crate::text::StyledChar;

/// Advance of `' '` in every text line font
pub const SPACE_ADVANCE: i32 = 4;

/// A glyph with its advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measured {
    /// Rendered glyphs
    pub component: WidthComponent,
    /// Spacers never break a line and take no inter-character spacing
    pub spacer: bool,
}

/// An inline icon bound in the line fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGlyph {
    /// Codepoint inside the line font
    pub codepoint: u32,
    /// Displayed width
    pub width: i32,
}

/// Width lookup for the characters of one text element
#[derive(Debug, Clone, Copy)]
pub struct LineMetrics<'a> {
    /// Glyph sheet sizes
    pub chars: &'a HashMap<char, CharWidth>,
    /// Inline icons by name, already scaled
    pub icons: &'a HashMap<String, IconGlyph>,
    /// Text scale
    pub scale: f64,
}

impl LineMetrics<'_> {
    /// Measure one styled character; unknown glyphs yield `None`
    ///
    /// Visible glyphs advance their scaled width plus the one pixel the client
    /// adds after every bitmap glyph.
    pub fn measure(&self, item: &StyledChar) -> Option<Measured> {
        match item {
            StyledChar::Char { ch: ' ', style } => Some(Measured {
                component: WidthComponent::glyph(' ' as u32, style.clone(), SPACE_ADVANCE),
                spacer: false,
            }),
            StyledChar::Char { ch, style } => self.chars.get(ch).map(|size| Measured {
                component: WidthComponent::glyph(*ch as u32, style.clone(), size.scaled_width(self.scale) + 1),
                spacer: false,
            }),
            StyledChar::Icon(name) => self.icons.get(name).map(|icon| Measured {
                component: WidthComponent::glyph(icon.codepoint, Style::default(), icon.width + 1),
                spacer: false,
            }),
            StyledChar::Space(n) => Some(Measured {
                component: WidthComponent::space(*n),
                spacer: true,
            }),
        }
    }
}

/// Greedy line splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreaker {
    /// Width budget per line
    pub max_width: i32,
    /// Maximum number of lines, the rest is dropped
    pub max_lines: usize,
    /// Inter-character spacer, `0` for none
    pub spacing: i32,
}

impl LineBreaker {
    /// Split measured glyphs into lines
    pub fn split(&self, items: impl IntoIterator<Item = Measured>) -> Vec<WidthComponent> {
        let mut lines = Vec::new();
        let mut current = WidthComponent::empty();
        let mut has_glyph = false;

        for item in items {
            if item.spacer {
                current += item.component;
                continue;
            }
            let mut gap = if has_glyph { self.spacing } else { 0 };
            if has_glyph && current.width() + gap + item.component.width() > self.max_width {
                if lines.len() + 1 >= self.max_lines {
                    break;
                }
                lines.push(std::mem::take(&mut current));
                has_glyph = false;
                gap = 0;
            }
            if gap > 0 {
                current += WidthComponent::glyph(TEXT_SPACE_CODEPOINT, Style::default(), gap);
            }
            current += item.component;
            has_glyph = true;
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Stack `b` under `a`, both drawn from the same origin
///
/// Centering puts the odd pixel after the narrower line.
#[allow(clippy::cast_possible_truncation)]
pub fn stack_lines(align: LayoutAlign, a: WidthComponent, b: WidthComponent) -> WidthComponent {
    let (wa, wb) = (a.width(), b.width());
    match align {
        LayoutAlign::Left => {
            let pad = if wa > wb { wa - wb } else { 0 };
            a + WidthComponent::space(-wa) + b + WidthComponent::space(pad)
        }
        LayoutAlign::Center if wa > wb => {
            let div = f64::from(wa - wb) / 2.0;
            a + WidthComponent::space((f64::from(-wa) + div).floor() as i32)
                + b
                + WidthComponent::space(div.ceil() as i32)
        }
        LayoutAlign::Center => {
            let div = (wb - wa) / 2;
            WidthComponent::space(div) + a + WidthComponent::space(-wa - div) + b
        }
        LayoutAlign::Right if wa > wb => {
            let div = wa - wb;
            a + WidthComponent::space(-wa + div) + b
        }
        LayoutAlign::Right => {
            let div = wb - wa;
            WidthComponent::space(div) + a + WidthComponent::space(-wa - div) + b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Glyph;

    fn run(width: i32) -> WidthComponent {
        WidthComponent::glyph('x' as u32, Style::default(), width)
    }

    fn glyph(width: i32) -> Measured {
        Measured {
            component: run(width),
            spacer: false,
        }
    }

    fn leading_space(component: &WidthComponent) -> i32 {
        match component.glyphs().first() {
            Some(Glyph::Space(n)) => *n,
            _ => 0,
        }
    }

    #[test]
    fn test_split_breaks_before_overflowing_glyph() {
        let breaker = LineBreaker {
            max_width: 20,
            max_lines: 3,
            spacing: 1,
        };
        // 6 + 1 + 6 + 1 + 6 = 20 fits, the fourth glyph would make 27
        let lines = breaker.split((0..5).map(|_| glyph(6)));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].width(), 20);
        assert_eq!(lines[1].width(), 13);
    }

    #[test]
    fn test_split_truncates_at_line_limit() {
        let breaker = LineBreaker {
            max_width: 10,
            max_lines: 2,
            spacing: 0,
        };
        let lines = breaker.split((0..10).map(|_| glyph(5)));
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.width() == 10));
    }

    #[test]
    fn test_spacers_never_break() {
        let breaker = LineBreaker {
            max_width: 10,
            max_lines: 2,
            spacing: 2,
        };
        let items = vec![
            glyph(4),
            Measured {
                component: WidthComponent::space(50),
                spacer: true,
            },
            glyph(4),
        ];
        let lines = breaker.split(items);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].width(), 54);
        assert_eq!(lines[1].width(), 4);
    }

    #[test]
    fn test_metrics_measure() {
        let mut chars = HashMap::new();
        chars.insert('a', CharWidth::new(5, 8));
        let mut icons = HashMap::new();
        icons.insert(
            "coin".to_string(),
            IconGlyph {
                codepoint: 0xC0001,
                width: 9,
            },
        );
        let metrics = LineMetrics {
            chars: &chars,
            icons: &icons,
            scale: 2.0,
        };
        let style = Style::default();
        let measure = |item: StyledChar| metrics.measure(&item).map(|m| m.component.width());
        assert_eq!(measure(StyledChar::Char { ch: 'a', style: style.clone() }), Some(11));
        assert_eq!(measure(StyledChar::Char { ch: ' ', style: style.clone() }), Some(4));
        assert_eq!(measure(StyledChar::Char { ch: 'z', style }), None);
        assert_eq!(measure(StyledChar::Icon("coin".to_string())), Some(10));
        assert_eq!(measure(StyledChar::Icon("gem".to_string())), None);
        assert_eq!(measure(StyledChar::Space(-3)), Some(-3));
    }

    #[test]
    fn test_center_tie_break() {
        let stacked = stack_lines(LayoutAlign::Center, run(10), run(7));
        assert_eq!(stacked.width(), 10);
        // the 7px line starts 1px in and is followed by 2px
        let glyphs = stacked.glyphs();
        assert_eq!(glyphs[1], Glyph::Space(-9));
        assert_eq!(glyphs.last(), Some(&Glyph::Space(2)));

        let stacked = stack_lines(LayoutAlign::Center, run(7), run(10));
        assert_eq!(stacked.width(), 10);
        assert_eq!(leading_space(&stacked), 1);
    }

    #[test]
    fn test_stacked_width_is_widest_line() {
        for align in [LayoutAlign::Left, LayoutAlign::Center, LayoutAlign::Right] {
            assert_eq!(stack_lines(align, run(12), run(5)).width(), 12, "{align:?}");
            assert_eq!(stack_lines(align, run(5), run(12)).width(), 12, "{align:?}");
        }
        let right = stack_lines(LayoutAlign::Right, run(5), run(12));
        assert_eq!(leading_space(&right), 7);
    }
}
