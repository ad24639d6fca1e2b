//! Shared state of one reload
//!
//! Every cache, counter and descriptor batch built while compiling displays
//! lives here and is dropped with the reload. Workers share the context by
//! reference; the mutexes are always taken in the order cache, namespaces,
//! emitter.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::component::{FontKey, Style};
use crate::config::HudSettings;
use crate::definition::PixelLocation;
use crate::error::{HudError, HudResult};
use crate::font::{
    CharWidth, DescriptorEmitter, FontDocument, GlyphBinding, HudShader, NamespaceKind,
    NamespaceTable, Provider, ShaderGroup,
};
use crate::layout::{BackgroundGlyphs, IconGlyph};
use crate::placeholder::PlaceholderRegistry;
use crate::resource::{BackgroundResource, Bitmap, ResourceSet, TextFontResource};

/// A definition skipped during a reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadWarning {
    /// Display, or resource category for resource failures
    pub display: String,
    /// Element path inside the display, or resource name
    pub element: String,
    /// File the display was loaded from
    pub source: String,
    /// What went wrong
    pub reason: String,
}

impl fmt::Display for ReloadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.display, self.element, self.reason)?;
        if !self.source.is_empty() {
            write!(f, " (in {})", self.source)?;
        }
        Ok(())
    }
}

/// Summary of a finished reload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Compiled displays
    pub displays: usize,
    /// Font documents written
    pub fonts: usize,
    /// Codepoints allocated across every font
    pub codepoints: u32,
    /// Everything that was skipped
    pub warnings: Vec<ReloadWarning>,
}

/// A per-line text font: character sheet, inline icons and background pieces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFont {
    /// Font the line's glyphs are bound to
    pub font: FontKey,
    /// Inline icons by name
    pub icons: HashMap<String, IconGlyph>,
    /// Background pieces, when the element has one
    pub background: Option<BackgroundGlyphs>,
}

/// Parameters of one text line font
#[derive(Debug, Clone, Copy)]
pub struct LineFontRequest<'r> {
    /// Text font resource
    pub text: &'r TextFontResource,
    /// Shader of the text glyphs
    pub shader: HudShader,
    /// Glyph scale
    pub scale: f64,
    /// Inter-character spacer
    pub space: i32,
    /// Ascent of the line
    pub ascent: i32,
    /// Extra icon offset
    pub emoji_pixel: PixelLocation,
    /// Extra icon scale
    pub emoji_scale: f64,
    /// Background and its scale
    pub background: Option<(&'r BackgroundResource, f64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LineFontKey {
    group: ShaderGroup,
    space: i32,
    emoji_y: i32,
    emoji_scale: u64,
    background: Option<(String, u64)>,
}

impl LineFontRequest<'_> {
    fn key(&self) -> LineFontKey {
        LineFontKey {
            group: ShaderGroup::new(self.shader, self.text.name.as_str(), self.scale, self.ascent),
            space: self.space,
            emoji_y: self.emoji_pixel.y,
            emoji_scale: self.emoji_scale.to_bits(),
            background: self
                .background
                .map(|(bg, scale)| (bg.name.clone(), scale.to_bits())),
        }
    }
}

/// Shared state of one reload
pub struct ReloadContext<'a> {
    /// Engine settings
    pub settings: &'a HudSettings,
    /// Placeholder producers
    pub registry: &'a PlaceholderRegistry,
    /// Resolved resources
    pub resources: &'a ResourceSet,
    line_cache: Mutex<HashMap<LineFontKey, Arc<LineFont>>>,
    image_cache: Mutex<HashMap<(FontKey, ShaderGroup), GlyphBinding>>,
    namespaces: Mutex<NamespaceTable>,
    emitter: Mutex<DescriptorEmitter>,
    textures: Mutex<BTreeSet<i32>>,
    warnings: Mutex<Vec<ReloadWarning>>,
}

/// Everything a reload produced besides the compiled displays
#[derive(Debug)]
pub struct ReloadOutput {
    /// Font documents sorted by path, space font included
    pub documents: Vec<FontDocument>,
    /// Distinct shaders
    pub shaders: Vec<HudShader>,
    /// Sizes of the generated single-pixel textures
    pub textures: Vec<i32>,
    /// Codepoints allocated
    pub codepoints: u32,
    /// Skipped definitions
    pub warnings: Vec<ReloadWarning>,
}

impl<'a> ReloadContext<'a> {
    /// Fresh context for one reload
    pub fn new(
        settings: &'a HudSettings,
        registry: &'a PlaceholderRegistry,
        resources: &'a ResourceSet,
    ) -> Self {
        Self {
            settings,
            registry,
            resources,
            line_cache: Mutex::new(HashMap::new()),
            image_cache: Mutex::new(HashMap::new()),
            namespaces: Mutex::new(NamespaceTable::new()),
            emitter: Mutex::new(DescriptorEmitter::new(settings.max_ascent)),
            textures: Mutex::new(BTreeSet::new()),
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// Codepoint bound to a bitmap in `font`, allocated on first request
    ///
    /// Requests with an equal group share one codepoint and one record.
    pub fn bind_bitmap(
        &self,
        font: &FontKey,
        kind: NamespaceKind,
        group: ShaderGroup,
        height: i32,
        width: i32,
    ) -> HudResult<GlyphBinding> {
        let key = (font.clone(), group);
        let mut cache = self.image_cache.lock();
        if let Some(binding) = cache.get(&key) {
            return Ok(binding.clone());
        }
        let codepoint = self.namespaces.lock().allocate(font, kind)?;
        let group = &key.1;
        self.emitter.lock().emit(font, &group.shader, group.ascent, |ascent| {
            Provider::single(&group.source, ascent, height, codepoint)
        });
        let binding = GlyphBinding {
            font: font.clone(),
            codepoint,
            width,
        };
        cache.insert(key, binding.clone());
        Ok(binding)
    }

    /// Line font for `request`, built on first request
    pub fn line_font(&self, request: &LineFontRequest<'_>) -> HudResult<Arc<LineFont>> {
        let key = request.key();
        let mut cache = self.line_cache.lock();
        if let Some(font) = cache.get(&key) {
            return Ok(Arc::clone(font));
        }

        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let font = FontKey::new(
            &self.settings.namespace,
            &format!("text/{}/{:016x}", request.text.name, hasher.finish()),
        );

        let pieces = match request.background {
            Some((bg, scale)) => {
                let sized = [&bg.left, &bg.body, &bg.right].map(|bitmap| {
                    let height = CharWidth::new(0, bitmap.height).scaled_height(scale);
                    let width = CharWidth::new(bitmap.width, 0)
                        .scaled_width(f64::from(height) / f64::from(bitmap.height));
                    (bitmap, height, width)
                });
                let [_, (_, _, body_width), _] = sized;
                if body_width <= 0 {
                    return Err(HudError::invalid(
                        "background",
                        format!("body of '{}' is not wider than 0 pixels", bg.name),
                    ));
                }
                Some((bg, sized))
            }
            None => None,
        };

        let mut namespaces = self.namespaces.lock();
        let needed = request.text.icons.len() + if pieces.is_some() { 3 } else { 0 };
        namespaces.reserve(
            &font,
            NamespaceKind::TextLine,
            u32::try_from(needed).unwrap_or(u32::MAX),
        )?;
        let mut emitter = self.emitter.lock();
        let text = request.text;
        let height = CharWidth::new(0, text.height).scaled_height(request.scale);
        emitter.start_line_font(&font, request.space.max(0));
        emitter.emit(&font, &request.shader, request.ascent, |ascent| Provider::Bitmap {
            file: text.file.clone(),
            ascent,
            height,
            chars: text.rows.clone(),
        });

        let icon_scale = request.scale * request.emoji_scale;
        let mut icons = HashMap::with_capacity(text.icons.len());
        for icon in &text.icons {
            let codepoint = namespaces.allocate(&font, NamespaceKind::TextLine)?;
            let height = icon.scaled_height(icon_scale);
            let ascent = request.ascent + icon.location.y + request.emoji_pixel.y;
            emitter.emit(&font, &request.shader, ascent, |ascent| {
                Provider::single(&icon.file, ascent, height, codepoint)
            });
            icons.insert(
                icon.name.clone(),
                IconGlyph {
                    codepoint,
                    width: icon.scaled_width(icon_scale),
                },
            );
        }

        let background = pieces.map(|(bg, sized)| {
            let shader = HudShader {
                layer: request.shader.layer - 1,
                outline: false,
                opacity: request.shader.opacity * bg.location.opacity,
                ..request.shader
            };
            let ascent = request.ascent + bg.location.y;
            let [left, body, right] = sized.map(|(bitmap, height, width)| {
                let codepoint = namespaces.allocate(&font, NamespaceKind::TextLine)?;
                emitter.emit(&font, &shader, ascent, |ascent| {
                    Provider::single(&bitmap.file, ascent, height, codepoint)
                });
                Ok::<_, HudError>(
                    GlyphBinding {
                        font: font.clone(),
                        codepoint,
                        width,
                    }
                    .component(Style::default()),
                )
            });
            Ok::<_, HudError>(BackgroundGlyphs {
                x: bg.location.x,
                left: left?,
                body: body?,
                right: right?,
            })
        });
        let background = background.transpose()?;
        drop(emitter);
        drop(namespaces);

        log::trace!("built line font {font}");
        let line = Arc::new(LineFont {
            font,
            icons,
            background,
        });
        cache.insert(key, Arc::clone(&line));
        Ok(line)
    }

    /// Register a `pixel`×`pixel` white texture; returns its file reference
    pub fn request_pixel_texture(&self, pixel: i32) -> String {
        self.textures.lock().insert(pixel);
        format!("{}:pixel_{pixel}.png", self.settings.namespace)
    }

    /// Record a skipped definition
    pub fn warn(&self, warning: ReloadWarning) {
        log::warn!("{warning}");
        self.warnings.lock().push(warning);
    }

    /// Record skipped definitions that were already logged
    pub fn extend_warnings(&self, warnings: impl IntoIterator<Item = ReloadWarning>) {
        self.warnings.lock().extend(warnings);
    }

    /// Close the reload and collect its output
    pub fn finish(self) -> ReloadOutput {
        let codepoints = self.namespaces.into_inner().total();
        let (mut documents, shaders) = self.emitter.into_inner().finish();
        documents.push(FontDocument::space_font(
            &self.settings.namespace,
            self.settings.space_range,
        ));
        documents.sort_by(|a, b| a.font.cmp(&b.font));
        ReloadOutput {
            documents,
            shaders,
            textures: self.textures.into_inner().into_iter().collect(),
            codepoints,
            warnings: self.warnings.into_inner(),
        }
    }
}
