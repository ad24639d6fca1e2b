//! Image elements
//!
//! An image renders one of its frames: picked by the animation frame for a
//! sequence, or by a number listener in `0.0..=1.0` where the first slot is
//! the empty frame. A stack placeholder repeats the picked frame.

use crate::component::{PixelComponent, Style, WidthComponent};
use crate::definition::ImageLayoutDef;
use crate::error::{HudError, HudResult};
use crate::font::{CharWidth, ShaderGroup};
use crate::placeholder::{Producer, ValueKind};
use crate::reload::ReloadContext;
use crate::subject::{RenderContext, Subject};

use super::{parse_color, DisplayScope, ElementGate, Placement};

/// A compiled image element
#[derive(Debug, Clone)]
pub struct ImageRenderer {
    frames: Vec<PixelComponent>,
    listener: Option<Producer>,
    stack: Option<Producer>,
    max_stack: u32,
    space: i32,
    reserved: i32,
    gate: ElementGate,
}

fn number_producer(ctx: &ReloadContext<'_>, reference: &str) -> HudResult<Producer> {
    ctx.registry
        .find(reference)?
        .expect_kind(reference, ValueKind::Number)
}

impl ImageRenderer {
    /// Compile `def` at `at`, binding every frame in the display's image font
    #[allow(clippy::cast_possible_truncation)]
    pub fn compile(
        def: &ImageLayoutDef,
        ctx: &ReloadContext<'_>,
        scope: &DisplayScope,
        at: Placement,
    ) -> HudResult<Self> {
        let image = ctx.resources.image(&def.image)?;
        if def.scale <= 0.0 {
            return Err(HudError::invalid("scale", "scale must be > 0"));
        }
        let style = def
            .color
            .as_deref()
            .map(parse_color)
            .transpose()?
            .map_or_else(Style::default, Style::colored);
        let (pixel, shader) = at.resolve(&def.element);

        let listener = image
            .listener
            .as_deref()
            .map(|reference| number_producer(ctx, reference))
            .transpose()?;
        let stack = def
            .stack
            .as_deref()
            .map(|reference| number_producer(ctx, reference))
            .transpose()?;
        let gate = ElementGate::compile(&def.element, &image.conditions, ctx.registry)?;

        let mut frames = Vec::with_capacity(image.frames.len() + 1);
        if listener.is_some() {
            frames.push(PixelComponent::empty());
        }
        for frame in &image.frames {
            let bitmap = &frame.bitmap;
            let height = CharWidth::new(0, bitmap.height).scaled_height(def.scale);
            if height <= 0 {
                return Err(HudError::invalid(
                    "scale",
                    format!("{} shrinks to nothing", bitmap.file),
                ));
            }
            let ratio = f64::from(height) / f64::from(bitmap.height);
            let width = CharWidth::new(bitmap.width, 0).scaled_width(ratio);
            let x_offset = (f64::from(frame.x_offset) * ratio).round() as i32;

            let group = ShaderGroup::new(shader, bitmap.file.as_str(), def.scale, pixel.y);
            let binding = ctx.bind_bitmap(
                &scope.image_font,
                scope.kind.namespace(),
                group,
                height,
                width,
            )?;
            frames.push(binding.component(style.clone()).to_pixel(pixel.x + x_offset));
        }

        let repeats = i32::try_from(def.max_stack.max(1)).unwrap_or(i32::MAX);
        let widest = frames.iter().map(PixelComponent::width).max().unwrap_or(0);
        let reserved = widest
            .saturating_mul(repeats)
            .saturating_add(def.space.saturating_mul(repeats - 1));

        Ok(Self {
            frames,
            listener,
            stack,
            max_stack: def.max_stack,
            space: def.space,
            reserved,
            gate,
        })
    }

    /// Width reserved for alignment
    pub const fn reserved_width(&self) -> i32 {
        self.reserved
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn frame_index(&self, subject: &dyn Subject, frame: u64) -> usize {
        let count = self.frames.len();
        match &self.listener {
            Some(listener) => {
                let value = listener.number(subject);
                if !value.is_finite() {
                    return 0;
                }
                let index = (value.clamp(0.0, 1.0) * (count - 1) as f64).round() as usize;
                index.min(count - 1)
            }
            None => (frame % count as u64) as usize,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn repeat_count(&self, subject: &dyn Subject) -> u32 {
        let Some(stack) = &self.stack else {
            return 1;
        };
        let value = stack.number(subject);
        if !value.is_finite() || value < 1.0 {
            return 0;
        }
        let count = value.floor().min(f64::from(u32::MAX)) as u32;
        if self.max_stack > 0 {
            count.min(self.max_stack)
        } else {
            count
        }
    }

    /// Positioned component for `subject`
    pub fn render(&self, ctx: &RenderContext<'_>, subject: &dyn Subject, frame: u64) -> PixelComponent {
        let Some(target) = self.gate.resolve(ctx.directory, subject) else {
            return PixelComponent::empty();
        };
        let base = &self.frames[self.frame_index(target, frame)];
        if base.is_empty() {
            return PixelComponent::empty();
        }
        match self.repeat_count(target) {
            0 => PixelComponent::empty(),
            1 => base.clone(),
            n => {
                let mut stacked = WidthComponent::empty();
                for i in 0..n {
                    if i > 0 {
                        stacked.push_space(self.space);
                    }
                    stacked += base.component().clone();
                }
                stacked.to_pixel(base.x())
            }
        }
    }
}
