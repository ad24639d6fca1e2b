//! Head elements
//!
//! A head is drawn row by row from a single white pixel texture: each of the
//! eight rows is one codepoint placed `pixel` lower than the previous, and
//! every skin pixel is that codepoint tinted with the pixel's colour.

use serde::{Deserialize, Serialize};

use crate::component::{PixelComponent, Style, TextColor, WidthComponent};
use crate::definition::HeadLayoutDef;
use crate::error::HudResult;
use crate::font::{GlyphBinding, HudShader, ShaderGroup};
use crate::layout::LayoutAlign;
use crate::reload::ReloadContext;
use crate::subject::{RenderContext, Subject, HEAD_SIZE};

use super::{DisplayScope, ElementGate, Placement};

/// How the hair layer of a skin is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadRenderType {
    /// Hair replaces face pixels
    #[default]
    Standard,
    /// Hair is a slightly larger outlined layer above the face
    Fancy,
}

#[derive(Debug, Clone)]
struct HeadRow {
    face: GlyphBinding,
    hair: Option<GlyphBinding>,
}

/// A compiled head element
#[derive(Debug, Clone)]
pub struct HeadRenderer {
    rows: Vec<HeadRow>,
    pixel: i32,
    x: i32,
    align: LayoutAlign,
    gate: ElementGate,
}

impl HeadRenderer {
    /// Compile `def` at `at`, binding one codepoint per row
    pub fn compile(
        def: &HeadLayoutDef,
        ctx: &ReloadContext<'_>,
        scope: &DisplayScope,
        at: Placement,
    ) -> HudResult<Self> {
        let head = ctx.resources.head(&def.name)?;
        let gate = ElementGate::compile(&def.element, &head.conditions, ctx.registry)?;
        let pixel_size = head.pixel;
        let (pixel, shader) = at.resolve(&def.element);
        let file = ctx.request_pixel_texture(pixel_size);
        let hair_shader = HudShader {
            render_scale: shader.render_scale.scaled(1.125),
            layer: shader.layer + 1,
            outline: true,
            ..shader
        };

        let bind = |shader: HudShader, ascent: i32| {
            ctx.bind_bitmap(
                &scope.image_font,
                scope.kind.namespace(),
                ShaderGroup::new(shader, file.as_str(), 1.0, ascent),
                pixel_size,
                pixel_size,
            )
        };
        let rows = (0..HEAD_SIZE)
            .map(|row| {
                let ascent = pixel.y + i32::try_from(row).unwrap_or(0) * pixel_size;
                let face = bind(shader, ascent)?;
                let hair = match def.kind {
                    HeadRenderType::Standard => None,
                    HeadRenderType::Fancy => Some(bind(hair_shader, ascent - pixel_size)?),
                };
                Ok(HeadRow { face, hair })
            })
            .collect::<HudResult<Vec<_>>>()?;

        Ok(Self {
            rows,
            pixel: pixel_size,
            x: pixel.x,
            align: def.align,
            gate,
        })
    }

    fn width(&self) -> i32 {
        self.pixel * 8
    }

    fn row_of<T: Copy>(
        &self,
        binding: &GlyphBinding,
        pixels: &[T; HEAD_SIZE],
        color: impl Fn(T) -> Option<TextColor>,
    ) -> WidthComponent {
        pixels
            .iter()
            .map(|&pixel| match color(pixel) {
                Some(tint) => binding.component(Style::colored(tint)),
                None => WidthComponent::space(self.pixel),
            })
            .sum()
    }

    /// Positioned component for `subject`
    pub fn render(&self, ctx: &RenderContext<'_>, subject: &dyn Subject) -> PixelComponent {
        let Some(target) = self.gate.resolve(ctx.directory, subject) else {
            return PixelComponent::empty();
        };
        let Some(skin) = ctx.skins.skin(target) else {
            return PixelComponent::empty();
        };
        let width = self.width();
        let mut out = WidthComponent::empty();
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                out.push_space(-width);
            }
            let face = &skin.face[index];
            match (skin.hair.as_ref().map(|hair| &hair[index]), &row.hair) {
                (Some(hair), Some(binding)) => {
                    out += self.row_of(&row.face, face, Some);
                    out.push_space(-width);
                    out += self.row_of(binding, hair, |pixel| pixel);
                }
                (Some(hair), None) => {
                    let merged: [TextColor; HEAD_SIZE] =
                        std::array::from_fn(|i| hair[i].unwrap_or(face[i]));
                    out += self.row_of(&row.face, &merged, Some);
                }
                (None, _) => out += self.row_of(&row.face, face, Some),
            }
        }
        out.to_pixel(self.x + self.align.origin_offset(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Glyph;
    use crate::definition::{ElementDef, PixelLocation};
    use crate::element::DisplayKind;
    use crate::subject::{HeadSkin, NoSubjects, SkinProvider, SubjectState};
    use crate::testing::Fixture;

    struct FixedSkin(HeadSkin);

    impl SkinProvider for FixedSkin {
        fn skin(&self, _subject: &dyn Subject) -> Option<HeadSkin> {
            Some(self.0.clone())
        }
    }

    fn def(kind: HeadRenderType) -> HeadLayoutDef {
        HeadLayoutDef {
            name: "face".to_string(),
            align: LayoutAlign::Center,
            kind,
            element: ElementDef {
                location: PixelLocation::new(20, 0),
                ..ElementDef::default()
            },
        }
    }

    fn scope() -> DisplayScope {
        DisplayScope::new(DisplayKind::Hud, "main", "test.toml", "hud")
    }

    fn compile(ctx: &ReloadContext<'_>, kind: HeadRenderType) -> HeadRenderer {
        HeadRenderer::compile(&def(kind), ctx, &scope(), Placement::origin()).unwrap()
    }

    fn tinted(out: &PixelComponent, color: TextColor) -> usize {
        out.component()
            .glyphs()
            .iter()
            .filter(|g| matches!(g, Glyph::Char { style, .. } if style.color == Some(color)))
            .count()
    }

    #[test]
    fn test_standard_head_is_eight_pixels_wide() {
        let fixture = Fixture::new();
        let ctx = fixture.context();
        let renderer = compile(&ctx, HeadRenderType::Standard);
        let red = TextColor(0xFF0000);
        let mut skin = HeadSkin::solid(red);
        let mut hair = [[None; HEAD_SIZE]; HEAD_SIZE];
        hair[0][0] = Some(TextColor(0x00FF00));
        skin.hair = Some(hair);
        let skins = FixedSkin(skin);
        let out = renderer.render(
            &RenderContext::new(&NoSubjects, &skins),
            &SubjectState::new("alex"),
        );
        assert_eq!(out.width(), 16);
        assert_eq!(out.x(), 20 - 8);
        assert_eq!(tinted(&out, red), 63);
        assert_eq!(tinted(&out, TextColor(0x00FF00)), 1);

        let output = ctx.finish();
        assert_eq!(output.codepoints, 8);
        assert_eq!(output.textures, vec![2]);
    }

    #[test]
    fn test_fancy_head_adds_hair_layer() {
        let fixture = Fixture::new();
        let ctx = fixture.context();
        let renderer = compile(&ctx, HeadRenderType::Fancy);
        let mut skin = HeadSkin::solid(TextColor(0xFF0000));
        let mut hair = [[None; HEAD_SIZE]; HEAD_SIZE];
        hair[0][3] = Some(TextColor(0x0000FF));
        skin.hair = Some(hair);
        let skins = FixedSkin(skin);
        let out = renderer.render(
            &RenderContext::new(&NoSubjects, &skins),
            &SubjectState::new("alex"),
        );
        assert_eq!(out.width(), 16);
        assert_eq!(tinted(&out, TextColor(0xFF0000)), 64);
        assert_eq!(tinted(&out, TextColor(0x0000FF)), 1);
        assert_eq!(ctx.finish().codepoints, 16);
    }

    #[test]
    fn test_missing_skin_renders_nothing() {
        let fixture = Fixture::new();
        let ctx = fixture.context();
        let renderer = compile(&ctx, HeadRenderType::Standard);
        assert!(renderer
            .render(&RenderContext::detached(), &SubjectState::new("alex"))
            .is_empty());
    }
}
