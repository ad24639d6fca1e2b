//! Reload engine
//!
//! [`HudEngine::reload`] compiles a whole [`LayoutBundle`] into a
//! [`Generation`] and swaps it in atomically. Renders grab the current
//! generation once and keep using it even if a reload lands meanwhile.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;

use crate::component::WidthComponent;
use crate::config::HudSettings;
use crate::definition::{HudDef, LayoutBundle, PopupDef};
use crate::error::PackError;
use crate::font::{FontDocument, HudShader};
use crate::foundation::parallel::run_parallel;
use crate::foundation::time::Stopwatch;
use crate::placeholder::PlaceholderRegistry;
use crate::popup::CompiledDisplay;
use crate::resource::{ImageProbe, ResourceSet};
use crate::subject::{RenderContext, Subject};

use super::context::{ReloadContext, ReloadReport, ReloadWarning};

/// A white square texture backing head pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTexture {
    /// Edge length in pixels
    pub pixel: i32,
    /// Output path inside the pack
    pub path: String,
}

impl GeneratedTexture {
    fn new(namespace: &str, pixel: i32) -> Self {
        Self {
            pixel,
            path: format!("{namespace}/textures/pixel_{pixel}.png"),
        }
    }

    /// PNG bytes of the texture
    pub fn encode(&self) -> Result<Vec<u8>, image::ImageError> {
        let size = u32::try_from(self.pixel.max(1)).unwrap_or(1);
        let texture = image::RgbaImage::from_pixel(size, size, image::Rgba([255, 255, 255, 255]));
        let mut bytes = Cursor::new(Vec::new());
        texture.write_to(&mut bytes, image::ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}

/// Sink for generated pack files
pub trait PackWriter {
    /// Store `bytes` at the pack-relative `path`
    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), PackError>;
}

/// Writes pack files below a directory
#[derive(Debug, Clone)]
pub struct DirectoryPackWriter {
    root: PathBuf,
}

impl DirectoryPackWriter {
    /// Writer rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PackWriter for DirectoryPackWriter {
    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), PackError> {
        let target = self.root.join(path);
        let io_error = |source| PackError::Io {
            path: target.display().to_string(),
            source,
        };
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&target, bytes).map_err(io_error)
    }
}

#[derive(Serialize)]
struct ShaderEntry<'a> {
    id: usize,
    #[serde(flatten)]
    shader: &'a HudShader,
}

/// One published build: compiled displays plus the pack files they need
#[derive(Debug, Default)]
pub struct Generation {
    namespace: String,
    space_range: i32,
    huds: IndexMap<String, CompiledDisplay>,
    popups: IndexMap<String, CompiledDisplay>,
    fonts: Vec<FontDocument>,
    textures: Vec<GeneratedTexture>,
    shaders: Vec<HudShader>,
    report: ReloadReport,
}

impl Generation {
    /// HUD by name
    pub fn hud(&self, name: &str) -> Option<&CompiledDisplay> {
        self.huds.get(name)
    }

    /// Popup by name
    pub fn popup(&self, name: &str) -> Option<&CompiledDisplay> {
        self.popups.get(name)
    }

    /// HUDs in declaration order
    pub fn huds(&self) -> impl Iterator<Item = &CompiledDisplay> {
        self.huds.values()
    }

    /// Popups in declaration order
    pub fn popups(&self) -> impl Iterator<Item = &CompiledDisplay> {
        self.popups.values()
    }

    /// Render the HUD `name`, animated by the subject's tick
    ///
    /// Spacers in rendered output never exceed the space font's range.
    pub fn render_hud(
        &self,
        name: &str,
        ctx: &RenderContext<'_>,
        subject: &dyn Subject,
    ) -> Option<WidthComponent> {
        self.hud(name).map(|hud| {
            hud.render(ctx, subject, 0, subject.tick())
                .fit_spaces(self.space_range)
        })
    }

    /// Render the popup `name` in `slot` at `frame`
    pub fn render_popup(
        &self,
        name: &str,
        ctx: &RenderContext<'_>,
        subject: &dyn Subject,
        slot: usize,
        frame: u64,
    ) -> Option<WidthComponent> {
        self.popup(name).map(|popup| {
            popup
                .render(ctx, subject, slot, frame)
                .fit_spaces(self.space_range)
        })
    }

    /// Font documents, sorted by font
    pub fn fonts(&self) -> &[FontDocument] {
        &self.fonts
    }

    /// Generated textures
    pub fn textures(&self) -> &[GeneratedTexture] {
        &self.textures
    }

    /// Distinct shaders, indexed by shader id
    pub fn shaders(&self) -> &[HudShader] {
        &self.shaders
    }

    /// Summary of the reload that built this generation
    pub fn report(&self) -> &ReloadReport {
        &self.report
    }

    /// Hand every generated file to `writer`; returns the number of files
    pub fn write_pack(&self, writer: &mut dyn PackWriter) -> Result<usize, PackError> {
        let mut written = 0;
        for document in &self.fonts {
            let path = document.relative_path();
            let json = document.to_json().map_err(|source| PackError::Json {
                path: path.clone(),
                source,
            })?;
            writer.write(&path, json.as_bytes())?;
            written += 1;
        }
        for texture in &self.textures {
            let bytes = texture.encode().map_err(|source| PackError::Image {
                path: texture.path.clone(),
                source,
            })?;
            writer.write(&texture.path, &bytes)?;
            written += 1;
        }
        let path = format!("{}/shaders.json", self.namespace);
        let entries: Vec<_> = self
            .shaders
            .iter()
            .enumerate()
            .map(|(id, shader)| ShaderEntry { id, shader })
            .collect();
        let json = serde_json::to_string_pretty(&entries).map_err(|source| PackError::Json {
            path: path.clone(),
            source,
        })?;
        writer.write(&path, json.as_bytes())?;
        log::debug!("wrote {} pack files", written + 1);
        Ok(written + 1)
    }
}

enum DisplayJob<'b> {
    Hud(&'b HudDef),
    Popup(&'b PopupDef),
}

impl DisplayJob<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Hud(def) => &def.name,
            Self::Popup(def) => &def.name,
        }
    }

    fn source(&self) -> &str {
        match self {
            Self::Hud(def) => &def.source,
            Self::Popup(def) => &def.source,
        }
    }

    const fn is_popup(&self) -> bool {
        matches!(self, Self::Popup(_))
    }
}

/// Owner of the published generation
pub struct HudEngine {
    settings: HudSettings,
    registry: PlaceholderRegistry,
    probe: Box<dyn ImageProbe>,
    current: RwLock<Arc<Generation>>,
}

impl HudEngine {
    /// Engine with an empty generation
    pub fn new(
        settings: HudSettings,
        registry: PlaceholderRegistry,
        probe: impl ImageProbe + 'static,
    ) -> Self {
        let empty = Generation {
            namespace: settings.namespace.clone(),
            space_range: settings.space_range,
            ..Generation::default()
        };
        Self {
            settings,
            registry,
            probe: Box::new(probe),
            current: RwLock::new(Arc::new(empty)),
        }
    }

    /// Engine settings
    pub const fn settings(&self) -> &HudSettings {
        &self.settings
    }

    /// Placeholder registry, for registering host producers before a reload
    pub fn registry_mut(&mut self) -> &mut PlaceholderRegistry {
        &mut self.registry
    }

    /// The generation renders should use
    pub fn current(&self) -> Arc<Generation> {
        Arc::clone(&self.current.read())
    }

    /// Compile `bundle` and publish it
    ///
    /// Broken definitions are skipped and listed in the returned report;
    /// the previous generation stays live until the new one is complete.
    pub fn reload(&self, bundle: &LayoutBundle) -> ReloadReport {
        let stopwatch = Stopwatch::start_new();
        let namespace = self.settings.namespace.as_str();
        let (resources, resource_warnings) =
            ResourceSet::compile(bundle, self.probe.as_ref(), namespace);
        let ctx = ReloadContext::new(&self.settings, &self.registry, &resources);
        ctx.extend_warnings(resource_warnings);

        let mut seen = HashSet::new();
        let jobs: Vec<DisplayJob<'_>> = bundle
            .huds
            .iter()
            .map(DisplayJob::Hud)
            .chain(bundle.popups.iter().map(DisplayJob::Popup))
            .filter(|job| {
                let first = seen.insert((job.is_popup(), job.name().to_string()));
                if !first {
                    ctx.warn(ReloadWarning {
                        display: job.name().to_string(),
                        element: String::new(),
                        source: job.source().to_string(),
                        reason: "a display with this name was already loaded".to_string(),
                    });
                }
                first
            })
            .collect();
        let workers = self.settings.worker_count();
        let results = run_parallel(&jobs, workers, |job| match job {
            DisplayJob::Hud(def) => CompiledDisplay::compile_hud(def, &ctx, &bundle.layouts),
            DisplayJob::Popup(def) => CompiledDisplay::compile_popup(def, &ctx, &bundle.layouts),
        });

        let mut huds = IndexMap::new();
        let mut popups = IndexMap::new();
        for (job, result) in jobs.iter().zip(results) {
            let display = match result {
                Ok(display) => display,
                Err(panic) => {
                    ctx.warn(ReloadWarning {
                        display: job.name().to_string(),
                        element: String::new(),
                        source: job.source().to_string(),
                        reason: format!("compilation panicked: {panic}"),
                    });
                    continue;
                }
            };
            let target = if job.is_popup() { &mut popups } else { &mut huds };
            target.insert(display.name().to_string(), display);
        }

        let output = ctx.finish();
        let report = ReloadReport {
            displays: huds.len() + popups.len(),
            fonts: output.documents.len(),
            codepoints: output.codepoints,
            warnings: output.warnings,
        };
        let generation = Generation {
            namespace: namespace.to_string(),
            space_range: self.settings.space_range,
            huds,
            popups,
            fonts: output.documents,
            textures: output
                .textures
                .into_iter()
                .map(|pixel| GeneratedTexture::new(namespace, pixel))
                .collect(),
            shaders: output.shaders,
            report: report.clone(),
        };
        log::info!(
            "reload finished in {:.1} ms: {} displays, {} fonts, {} codepoints, {} warnings ({workers} workers)",
            stopwatch.elapsed_millis(),
            report.displays,
            report.fonts,
            report.codepoints,
            report.warnings.len()
        );
        *self.current.write() = Arc::new(generation);
        report
    }
}
