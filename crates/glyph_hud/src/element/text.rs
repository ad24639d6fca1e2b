//! Text elements

use std::sync::Arc;

use crate::component::{PixelComponent, Style, WidthComponent};
use crate::definition::TextLayoutDef;
use crate::error::{HudError, HudResult};
use crate::layout::{stack_lines, LayoutAlign, LineBreaker, LineMetrics};
use crate::reload::{LineFont, LineFontRequest, ReloadContext};
use crate::resource::TextFontResource;
use crate::subject::{RenderContext, Subject};
use crate::text::{Equation, NumberFormat, NumberFormatter, TextOptions, TextPattern};

use super::{parse_color, ElementGate, Placement};

/// A compiled text element
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pattern: TextPattern,
    text: Arc<TextFontResource>,
    fonts: Vec<Arc<LineFont>>,
    scale: f64,
    breaker: LineBreaker,
    align: LayoutAlign,
    line_align: LayoutAlign,
    x: i32,
    gate: ElementGate,
}

fn validate(def: &TextLayoutDef) -> HudResult<()> {
    if def.scale <= 0.0 {
        return Err(HudError::invalid("scale", "scale must be > 0"));
    }
    if def.emoji_scale <= 0.0 {
        return Err(HudError::invalid("emoji-scale", "emoji scale must be > 0"));
    }
    if def.background_scale.is_some_and(|scale| scale <= 0.0) {
        return Err(HudError::invalid("background-scale", "background scale must be > 0"));
    }
    if def.line < 1 {
        return Err(HudError::invalid("line", "line cannot be < 1"));
    }
    if def.split_width < 1 {
        return Err(HudError::invalid("split-width", "split width cannot be < 1"));
    }
    Ok(())
}

fn options(def: &TextLayoutDef, ctx: &ReloadContext<'_>) -> HudResult<TextOptions> {
    let settings = ctx.settings;
    let color = parse_color(def.color.as_deref().unwrap_or(&settings.default_color))?;
    let legacy = def
        .use_legacy_format
        .unwrap_or(settings.use_legacy_format)
        .then(|| def.legacy_serializer.unwrap_or(settings.legacy_serializer));
    let numbers = if def
        .disable_number_format
        .unwrap_or(settings.disable_number_format)
    {
        None
    } else {
        let equation = def
            .number_equation
            .as_deref()
            .unwrap_or(&settings.number_equation);
        let format = def.number_format.as_deref().unwrap_or(&settings.number_format);
        Some(NumberFormatter::new(
            Equation::parse(equation)?,
            NumberFormat::parse(format)?,
        )?)
    };
    Ok(TextOptions {
        base: Style::colored(color),
        legacy,
        numbers,
    })
}

impl TextRenderer {
    /// Compile `def` at `at`, building one line font per allowed line
    pub fn compile(
        def: &TextLayoutDef,
        ctx: &ReloadContext<'_>,
        at: Placement,
    ) -> HudResult<Self> {
        validate(def)?;
        let text = ctx.resources.text(&def.name)?;
        let background = def
            .background
            .as_deref()
            .map(|name| ctx.resources.background(name))
            .transpose()?;
        let pattern = TextPattern::compile(&def.pattern, ctx.registry, options(def, ctx)?)?;
        let gate = ElementGate::compile(&def.element, &text.conditions, ctx.registry)?;
        let (pixel, shader) = at.resolve(&def.element);

        let lines = i32::try_from(def.line).unwrap_or(i32::MAX);
        let fonts = (0..lines)
            .map(|line| {
                ctx.line_font(&LineFontRequest {
                    text: text.as_ref(),
                    shader,
                    scale: def.scale,
                    space: def.space,
                    ascent: pixel.y + line * def.line_width,
                    emoji_pixel: def.emoji_pixel,
                    emoji_scale: def.emoji_scale,
                    background: background
                        .as_deref()
                        .map(|bg| (bg, def.background_scale.unwrap_or(def.scale))),
                })
            })
            .collect::<HudResult<Vec<_>>>()?;

        let breaker = LineBreaker {
            max_width: if def.line == 1 {
                i32::MAX
            } else {
                i32::try_from(def.split_width).unwrap_or(i32::MAX)
            },
            max_lines: fonts.len(),
            spacing: def.space.max(0),
        };

        Ok(Self {
            pattern,
            text,
            fonts,
            scale: def.scale,
            breaker,
            align: def.align,
            line_align: def.line_align,
            x: pixel.x,
            gate,
        })
    }

    /// Positioned component for `subject`
    pub fn render(&self, ctx: &RenderContext<'_>, subject: &dyn Subject) -> PixelComponent {
        let Some(target) = self.gate.resolve(ctx.directory, subject) else {
            return PixelComponent::empty();
        };
        let Some(first) = self.fonts.first() else {
            return PixelComponent::empty();
        };
        let metrics = LineMetrics {
            chars: &self.text.widths,
            icons: &first.icons,
            scale: self.scale,
        };
        let chars = self.pattern.render(target);
        let lines = self
            .breaker
            .split(chars.iter().filter_map(|item| metrics.measure(item)));

        let mut stacked: Option<WidthComponent> = None;
        let mut max = 0;
        for (line, font) in lines.into_iter().zip(&self.fonts) {
            let mut line = line.with_font(&font.font);
            if let Some(background) = &font.background {
                line = background.wrap(line);
            }
            max = max.max(line.width());
            stacked = Some(match stacked {
                None => line,
                Some(above) => stack_lines(self.line_align, above, line),
            });
        }
        stacked.map_or_else(PixelComponent::empty, |component| {
            component.to_pixel(self.x + self.align.origin_offset(max))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Glyph;
    use crate::definition::{ConditionRule, ElementDef, PixelLocation};
    use crate::font::TEXT_SPACE_CODEPOINT;
    use crate::subject::{SubjectMap, SubjectState};
    use crate::testing::Fixture;

    fn def(pattern: &str) -> TextLayoutDef {
        TextLayoutDef {
            name: "default".to_string(),
            pattern: pattern.to_string(),
            scale: 1.0,
            space: 0,
            align: LayoutAlign::Left,
            line_align: LayoutAlign::Left,
            color: None,
            number_equation: None,
            number_format: None,
            disable_number_format: None,
            background: None,
            background_scale: None,
            emoji_pixel: PixelLocation::ZERO,
            emoji_scale: 1.0,
            use_legacy_format: None,
            legacy_serializer: None,
            line: 1,
            split_width: 200,
            line_width: 10,
            element: ElementDef::default(),
        }
    }

    fn visible(out: &PixelComponent) -> usize {
        out.component()
            .glyphs()
            .iter()
            .filter(|g| matches!(g, Glyph::Char { .. }))
            .count()
    }

    fn render(def: &TextLayoutDef, subject: &SubjectState) -> PixelComponent {
        let fixture = Fixture::new();
        let ctx = fixture.context();
        let renderer = TextRenderer::compile(def, &ctx, Placement::origin()).unwrap();
        renderer.render(&RenderContext::detached(), subject)
    }

    #[test]
    fn test_widths_follow_glyph_advances() {
        // 'a' is 5 wide, 'b' is 3 wide, each glyph adds one pixel
        let out = render(&def("ab a"), &SubjectState::new("alex"));
        assert_eq!(out.width(), 6 + 4 + 4 + 6);
        assert_eq!(out.x(), 0);
    }

    #[test]
    fn test_unknown_glyphs_are_dropped() {
        let out = render(&def("a~a"), &SubjectState::new("alex"));
        assert_eq!(out.width(), 12);
    }

    #[test]
    fn test_spacer_only_between_visible_glyphs() {
        let mut spaced = def("aba");
        spaced.space = 2;
        let out = render(&spaced, &SubjectState::new("alex"));
        assert_eq!(out.width(), 6 + 2 + 4 + 2 + 6);
        let spacers = out
            .component()
            .glyphs()
            .iter()
            .filter(|g| matches!(g, Glyph::Char { codepoint: TEXT_SPACE_CODEPOINT, .. }))
            .count();
        assert_eq!(spacers, 2);
    }

    #[test]
    fn test_alignment_moves_origin() {
        let mut centered = def("aa");
        centered.align = LayoutAlign::Center;
        centered.element.location = PixelLocation::new(10, 0);
        assert_eq!(render(&centered, &SubjectState::new("alex")).x(), 10 - 6);

        centered.align = LayoutAlign::Right;
        assert_eq!(render(&centered, &SubjectState::new("alex")).x(), 10 - 12);
    }

    #[test]
    fn test_placeholders_and_icons() {
        let subject = SubjectState::new("alex").with_attribute("coins", "ab");
        let out = render(&def("<image:coin>[string:coins]<space:-3>"), &subject);
        assert_eq!(out.width(), 9 + 6 + 4 - 3);
    }

    #[test]
    fn test_multi_line_split_and_stack() {
        let mut lines = def("aaaa");
        lines.line = 2;
        lines.split_width = 12;
        lines.line_align = LayoutAlign::Center;
        let out = render(&lines, &SubjectState::new("alex"));
        assert_eq!(out.width(), 12);
        assert_eq!(visible(&out), 4);

        let mut truncated = def("aaaaaa");
        truncated.line = 2;
        truncated.split_width = 12;
        let out = render(&truncated, &SubjectState::new("alex"));
        assert_eq!(visible(&out), 4);
    }

    #[test]
    fn test_background_wraps_each_line() {
        let mut boxed = def("aa");
        boxed.background = Some("plate".to_string());
        // plate: 2 + n*4 + 2 around 12 pixels of text
        let out = render(&boxed, &SubjectState::new("alex"));
        assert_eq!(out.width(), 2 + 2 * 4 + 2);
        let mut wide = def("aaa");
        wide.background = Some("plate".to_string());
        assert_eq!(render(&wide, &SubjectState::new("alex")).width(), 2 + 4 * 4 + 2);
    }

    #[test]
    fn test_number_format_applies_to_plain_text() {
        let mut formatted = def("[number:health]");
        formatted.disable_number_format = Some(false);
        formatted.number_format = Some("0".to_string());
        let subject = SubjectState::new("alex").with_attribute("health", 1.4);
        let out = render(&formatted, &subject);
        // "1" is 2 wide in the fixture font
        assert_eq!(out.width(), 3);
    }

    #[test]
    fn test_follow_missing_with_cancel_renders_empty() {
        let mut follow = def("a");
        follow.element.follow = Some("[string:target]".to_string());
        follow.element.conditions = vec![ConditionRule::new("tick", ">=", "0")];
        let subject = SubjectState::new("alex").with_attribute("target", "steve");
        assert!(render(&follow, &subject).is_empty());

        let fixture = Fixture::new();
        let ctx = fixture.context();
        let renderer = TextRenderer::compile(&follow, &ctx, Placement::origin()).unwrap();
        let mut directory = SubjectMap::new();
        directory.insert(SubjectState::new("steve"));
        let skins = crate::subject::NoSkins;
        let out = renderer.render(&RenderContext::new(&directory, &skins), &subject);
        assert_eq!(out.width(), 6);
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let fixture = Fixture::new();
        let ctx = fixture.context();
        let mut zero_lines = def("a");
        zero_lines.line = 0;
        assert!(matches!(
            TextRenderer::compile(&zero_lines, &ctx, Placement::origin()),
            Err(HudError::InvalidField { field: "line", .. })
        ));
        let mut unknown = def("a");
        unknown.name = "missing".to_string();
        assert!(TextRenderer::compile(&unknown, &ctx, Placement::origin()).is_err());
        let mut bad_equation = def("a");
        bad_equation.disable_number_format = Some(false);
        bad_equation.number_equation = Some("t +".to_string());
        assert!(TextRenderer::compile(&bad_equation, &ctx, Placement::origin()).is_err());
    }
}
