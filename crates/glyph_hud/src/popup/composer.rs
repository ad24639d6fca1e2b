//! Display composition
//!
//! A display is a list of layouts. Each layout is compiled once per location
//! slot and animation frame; rendering picks the slot and frame, gates the
//! layout with its own condition, and overlays the layout boxes.

use crate::component::{PixelComponent, WidthComponent};
use crate::definition::{GuiLocation, HudDef, LayoutDef, LayoutRef, PixelLocation, PopupDef};
use crate::element::{
    AnimationType, DisplayKind, DisplayScope, ElementRenderer, HeadRenderer, ImageRenderer,
    Placement, TextRenderer,
};
use crate::error::{HudError, HudResult};
use crate::layout::LayoutAlign;
use crate::placeholder::ConditionBuilder;
use crate::reload::ReloadContext;
use crate::subject::{RenderContext, Subject};

use super::container::LayoutComponentContainer;

/// Elements of one layout at one slot and frame
type ElementGroup = Vec<ElementRenderer>;

/// A layout compiled for every slot and frame of its display
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    name: String,
    condition: ConditionBuilder,
    animation: AnimationType,
    offset: LayoutAlign,
    align: LayoutAlign,
    groups: Vec<Vec<ElementGroup>>,
}

/// One slot a display can be shown in
#[derive(Debug, Clone, Copy)]
struct Slot {
    gui: GuiLocation,
    pixel: PixelLocation,
}

impl CompiledLayout {
    fn compile(
        def: &LayoutDef,
        layout_ref: &LayoutRef,
        slots: &[Slot],
        ctx: &ReloadContext<'_>,
        scope: &DisplayScope,
    ) -> HudResult<Self> {
        let condition = ConditionBuilder::parse(&def.conditions, ctx.registry)?;
        let groups = slots
            .iter()
            .enumerate()
            .map(|(slot_index, slot)| {
                def.animation
                    .frames
                    .iter()
                    .enumerate()
                    .map(|(frame_index, frame)| {
                        let at = Placement {
                            gui: slot.gui + layout_ref.gui,
                            pixel: layout_ref.pixel + *frame + slot.pixel,
                        };
                        let report = slot_index == 0 && frame_index == 0;
                        compile_group(def, ctx, scope, at, report)
                    })
                    .collect()
            })
            .collect();
        Ok(Self {
            name: def.name.clone(),
            condition,
            animation: def.animation.kind,
            offset: def.offset,
            align: def.align,
            groups,
        })
    }

    /// Layout name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Box for `subject`, `None` when the layout is hidden
    fn render(
        &self,
        ctx: &RenderContext<'_>,
        subject: &dyn Subject,
        slot: usize,
        frame: u64,
    ) -> Option<PixelComponent> {
        if !self.condition.evaluate(subject) {
            return None;
        }
        let frames = self.groups.get(slot)?;
        let group = frames.get(self.animation.select(frame, frames.len()))?;
        let reserved = group
            .iter()
            .map(ElementRenderer::reserved_width)
            .max()
            .unwrap_or(0);
        let built = LayoutComponentContainer::new(self.offset, self.align, reserved)
            .append(group.iter().map(|element| element.render(ctx, subject, frame)))
            .build();
        Some(built)
    }
}

fn compile_group(
    def: &LayoutDef,
    ctx: &ReloadContext<'_>,
    scope: &DisplayScope,
    at: Placement,
    report: bool,
) -> ElementGroup {
    let mut group = Vec::with_capacity(def.images.len() + def.texts.len() + def.heads.len());
    let mut keep = |path: String, compiled: HudResult<ElementRenderer>| match compiled {
        Ok(renderer) => group.push(renderer),
        Err(err) if report => ctx.warn(scope.warning(path, &err)),
        Err(_) => {}
    };
    for (i, image) in def.images.iter().enumerate() {
        keep(
            format!("{}/images[{i}]", def.name),
            ImageRenderer::compile(image, ctx, scope, at).map(ElementRenderer::Image),
        );
    }
    for (i, text) in def.texts.iter().enumerate() {
        keep(
            format!("{}/texts[{i}]", def.name),
            TextRenderer::compile(text, ctx, at).map(ElementRenderer::Text),
        );
    }
    for (i, head) in def.heads.iter().enumerate() {
        keep(
            format!("{}/heads[{i}]", def.name),
            HeadRenderer::compile(head, ctx, scope, at).map(ElementRenderer::Head),
        );
    }
    group
}

/// A compiled HUD or popup
#[derive(Debug, Clone)]
pub struct CompiledDisplay {
    scope: DisplayScope,
    slots: usize,
    layouts: Vec<CompiledLayout>,
}

impl CompiledDisplay {
    fn compile(
        scope: DisplayScope,
        refs: &[LayoutRef],
        slots: &[Slot],
        ctx: &ReloadContext<'_>,
        layouts: &[LayoutDef],
    ) -> Self {
        let compiled = refs
            .iter()
            .filter_map(|layout_ref| {
                let Some(def) = layouts.iter().find(|def| def.name == layout_ref.name) else {
                    let err = HudError::missing("layout", &layout_ref.name);
                    ctx.warn(scope.warning(layout_ref.name.as_str(), &err));
                    return None;
                };
                match CompiledLayout::compile(def, layout_ref, slots, ctx, &scope) {
                    Ok(layout) => Some(layout),
                    Err(err) => {
                        ctx.warn(scope.warning(layout_ref.name.as_str(), &err));
                        None
                    }
                }
            })
            .collect();
        log::debug!(
            "compiled {} {} with {} slot(s)",
            scope.kind.label(),
            scope.name,
            slots.len()
        );
        Self {
            slots: slots.len(),
            scope,
            layouts: compiled,
        }
    }

    /// Compile an always-on display with a single slot
    pub fn compile_hud(def: &HudDef, ctx: &ReloadContext<'_>, layouts: &[LayoutDef]) -> Self {
        let scope = DisplayScope::new(
            DisplayKind::Hud,
            &def.name,
            &def.source,
            &ctx.settings.namespace,
        );
        let slot = Slot {
            gui: GuiLocation::default(),
            pixel: PixelLocation::ZERO,
        };
        Self::compile(scope, &def.layouts, &[slot], ctx, layouts)
    }

    /// Compile a popup, one slot per move location
    pub fn compile_popup(def: &PopupDef, ctx: &ReloadContext<'_>, layouts: &[LayoutDef]) -> Self {
        let scope = DisplayScope::new(
            DisplayKind::Popup,
            &def.name,
            &def.source,
            &ctx.settings.namespace,
        );
        let slots: Vec<_> = def
            .move_locations
            .iter()
            .map(|location| Slot {
                gui: location.gui + def.gui,
                pixel: location.pixel,
            })
            .collect();
        Self::compile(scope, &def.layouts, &slots, ctx, layouts)
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.scope.name
    }

    /// HUD or popup
    pub const fn kind(&self) -> DisplayKind {
        self.scope.kind
    }

    /// Number of location slots
    pub const fn slots(&self) -> usize {
        self.slots
    }

    /// Compiled layouts in draw order
    pub fn layouts(&self) -> &[CompiledLayout] {
        &self.layouts
    }

    /// Glyphs of the display in `slot` at `frame`
    ///
    /// Every layout is drawn from the display origin; the cursor ends at the
    /// right edge of the widest layout. Out-of-range slots render nothing.
    pub fn render(
        &self,
        ctx: &RenderContext<'_>,
        subject: &dyn Subject,
        slot: usize,
        frame: u64,
    ) -> WidthComponent {
        if slot >= self.slots {
            return WidthComponent::empty();
        }
        let mut out = WidthComponent::empty();
        let mut max = 0;
        for layout in &self.layouts {
            let Some(built) = layout.render(ctx, subject, slot, frame) else {
                continue;
            };
            max = max.max(built.x() + built.width());
            out += built.overlay();
        }
        if out.is_empty() {
            return out;
        }
        out.push_space(max);
        out
    }
}
