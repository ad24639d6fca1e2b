//! Resolved resources
//!
//! Definitions may leave bitmap sizes and glyph widths out; they are probed
//! from the asset directory when the bundle is compiled. Anything declared
//! explicitly wins over what the probe measures.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::definition::{
    BackgroundDef, BitmapDef, ConditionRule, IconDef, ImageDef, LayoutBundle, PixelLocation,
    TextFontDef,
};
use crate::error::{HudError, HudResult};
use crate::font::{measure, CharWidth, ImageCharWidth, SheetMetrics};
use crate::reload::ReloadWarning;

/// Source of image sizes and glyph sheets
pub trait ImageProbe: Send + Sync {
    /// Width and height of `file`
    fn dimensions(&self, file: &str) -> HudResult<(u32, u32)>;

    /// Measured glyphs of the sheet `file`
    fn sheet(&self, file: &str, rows: &[String], height: Option<u32>) -> HudResult<SheetMetrics>;
}

/// Reads PNG files below an asset root
#[derive(Debug, Clone)]
pub struct DirectoryProbe {
    root: PathBuf,
}

impl DirectoryProbe {
    /// Probe files relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn probe_error(file: &str, err: &image::ImageError) -> HudError {
        HudError::Probe {
            path: file.to_string(),
            reason: err.to_string(),
        }
    }
}

impl ImageProbe for DirectoryProbe {
    fn dimensions(&self, file: &str) -> HudResult<(u32, u32)> {
        image::image_dimensions(self.root.join(file)).map_err(|e| Self::probe_error(file, &e))
    }

    fn sheet(&self, file: &str, rows: &[String], height: Option<u32>) -> HudResult<SheetMetrics> {
        let sheet = image::open(self.root.join(file))
            .map_err(|e| Self::probe_error(file, &e))?
            .to_rgba8();
        measure(&sheet, rows, height)
    }
}

/// Probe for bundles that declare every size
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl ImageProbe for NoProbe {
    fn dimensions(&self, file: &str) -> HudResult<(u32, u32)> {
        Err(HudError::Probe {
            path: file.to_string(),
            reason: "size is not declared and probing is disabled".to_string(),
        })
    }

    fn sheet(&self, file: &str, _rows: &[String], _height: Option<u32>) -> HudResult<SheetMetrics> {
        self.dimensions(file).map(|_| SheetMetrics::default())
    }
}

/// A bitmap with known size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Texture reference, `namespace:path`
    pub file: String,
    /// Source width
    pub width: u32,
    /// Source height
    pub height: u32,
}

impl Bitmap {
    fn resolve(def: &BitmapDef, probe: &dyn ImageProbe, namespace: &str) -> HudResult<Self> {
        let (width, height) = match (def.width, def.height) {
            (Some(width), Some(height)) => (width, height),
            (width, height) => {
                let (probed_w, probed_h) = probe.dimensions(&def.file)?;
                (width.unwrap_or(probed_w), height.unwrap_or(probed_h))
            }
        };
        if width == 0 || height == 0 {
            return Err(HudError::invalid(
                "file",
                format!("{} has an empty size {width}x{height}", def.file),
            ));
        }
        Ok(Self {
            file: format!("{namespace}:{}", def.file),
            width,
            height,
        })
    }
}

/// One frame of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    /// Bitmap
    pub bitmap: Bitmap,
    /// Horizontal shift in source pixels
    pub x_offset: i32,
}

/// A resolved image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResource {
    /// Name
    pub name: String,
    /// Frames in display order, never empty
    pub frames: Vec<ImageFrame>,
    /// Number placeholder picking a frame
    pub listener: Option<String>,
    /// Visibility rules
    pub conditions: Vec<ConditionRule>,
}

/// A resolved text font
#[derive(Debug, Clone, PartialEq)]
pub struct TextFontResource {
    /// Name
    pub name: String,
    /// Sheet texture reference, `namespace:path`
    pub file: String,
    /// Characters per sheet row
    pub rows: Vec<String>,
    /// Cell height
    pub height: u32,
    /// Glyph sizes
    pub widths: HashMap<char, CharWidth>,
    /// Inline icons
    pub icons: Vec<ImageCharWidth>,
    /// Visibility rules
    pub conditions: Vec<ConditionRule>,
}

/// A resolved background
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundResource {
    /// Name
    pub name: String,
    /// Left cap
    pub left: Bitmap,
    /// Repeated body
    pub body: Bitmap,
    /// Right cap
    pub right: Bitmap,
    /// Placement relative to the line
    pub location: PixelLocation,
}

/// A resolved head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResource {
    /// Name
    pub name: String,
    /// Size of one skin pixel
    pub pixel: i32,
    /// Visibility rules
    pub conditions: Vec<ConditionRule>,
}

/// Every resource of a bundle, by name
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    images: HashMap<String, Arc<ImageResource>>,
    texts: HashMap<String, Arc<TextFontResource>>,
    backgrounds: HashMap<String, Arc<BackgroundResource>>,
    heads: HashMap<String, Arc<HeadResource>>,
}

fn resource_warning(kind: &str, name: &str, err: &HudError) -> ReloadWarning {
    ReloadWarning {
        display: kind.to_string(),
        element: name.to_string(),
        source: String::new(),
        reason: err.to_string(),
    }
}

impl ResourceSet {
    /// Resolve every resource; broken ones are left out and reported
    pub fn compile(
        bundle: &LayoutBundle,
        probe: &dyn ImageProbe,
        namespace: &str,
    ) -> (Self, Vec<ReloadWarning>) {
        let mut set = Self::default();
        let mut warnings = Vec::new();
        let mut report = |kind: &str, name: &str, err: &HudError| {
            log::warn!("skipping {kind} '{name}': {err}");
            warnings.push(resource_warning(kind, name, err));
        };

        for def in &bundle.images {
            match resolve_image(def, probe, namespace) {
                Ok(image) => {
                    set.images.insert(def.name.clone(), Arc::new(image));
                }
                Err(err) => report("image", &def.name, &err),
            }
        }
        for def in &bundle.texts {
            match resolve_text(def, probe, namespace) {
                Ok(text) => {
                    set.texts.insert(def.name.clone(), Arc::new(text));
                }
                Err(err) => report("text", &def.name, &err),
            }
        }
        for def in &bundle.backgrounds {
            match resolve_background(def, probe, namespace) {
                Ok(background) => {
                    set.backgrounds.insert(def.name.clone(), Arc::new(background));
                }
                Err(err) => report("background", &def.name, &err),
            }
        }
        for def in &bundle.heads {
            if def.pixel <= 0 {
                report("head", &def.name, &HudError::invalid("pixel", "pixel must be > 0"));
                continue;
            }
            set.heads.insert(
                def.name.clone(),
                Arc::new(HeadResource {
                    name: def.name.clone(),
                    pixel: def.pixel,
                    conditions: def.conditions.clone(),
                }),
            );
        }
        log::debug!(
            "resolved {} images, {} text fonts, {} backgrounds, {} heads",
            set.images.len(),
            set.texts.len(),
            set.backgrounds.len(),
            set.heads.len()
        );
        (set, warnings)
    }

    /// Image by name
    pub fn image(&self, name: &str) -> HudResult<Arc<ImageResource>> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| HudError::missing("image", name))
    }

    /// Text font by name
    pub fn text(&self, name: &str) -> HudResult<Arc<TextFontResource>> {
        self.texts
            .get(name)
            .cloned()
            .ok_or_else(|| HudError::missing("text", name))
    }

    /// Background by name
    pub fn background(&self, name: &str) -> HudResult<Arc<BackgroundResource>> {
        self.backgrounds
            .get(name)
            .cloned()
            .ok_or_else(|| HudError::missing("background", name))
    }

    /// Head by name
    pub fn head(&self, name: &str) -> HudResult<Arc<HeadResource>> {
        self.heads
            .get(name)
            .cloned()
            .ok_or_else(|| HudError::missing("head", name))
    }
}

fn resolve_image(def: &ImageDef, probe: &dyn ImageProbe, namespace: &str) -> HudResult<ImageResource> {
    if def.frames.is_empty() {
        return Err(HudError::invalid("frames", "an image needs at least one frame"));
    }
    let frames = def
        .frames
        .iter()
        .map(|frame| {
            Ok(ImageFrame {
                bitmap: Bitmap::resolve(&frame.bitmap, probe, namespace)?,
                x_offset: frame.x_offset,
            })
        })
        .collect::<HudResult<Vec<_>>>()?;
    Ok(ImageResource {
        name: def.name.clone(),
        frames,
        listener: def.listener.clone(),
        conditions: def.conditions.clone(),
    })
}

fn resolve_icon(def: &IconDef, probe: &dyn ImageProbe, namespace: &str) -> HudResult<ImageCharWidth> {
    if def.scale <= 0.0 {
        return Err(HudError::invalid("scale", "icon scale must be > 0"));
    }
    let bitmap = Bitmap::resolve(&def.bitmap, probe, namespace)?;
    Ok(ImageCharWidth {
        name: def.name.clone(),
        file: bitmap.file,
        location: def.pixel,
        scale: def.scale,
        size: CharWidth::new(bitmap.width, bitmap.height),
    })
}

fn declared_widths(def: &TextFontDef, height: u32) -> HudResult<HashMap<char, CharWidth>> {
    def.widths
        .iter()
        .map(|(key, &width)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok((ch, CharWidth::new(width, height))),
                _ => Err(HudError::invalid(
                    "widths",
                    format!("'{key}' is not a single character"),
                )),
            }
        })
        .collect()
}

fn resolve_text(def: &TextFontDef, probe: &dyn ImageProbe, namespace: &str) -> HudResult<TextFontResource> {
    if def.chars.is_empty() {
        return Err(HudError::invalid("chars", "a text font needs at least one row"));
    }
    let fully_declared = def.height.is_some()
        && def
            .chars
            .iter()
            .flat_map(|row| row.chars())
            .all(|ch| def.widths.contains_key(ch.to_string().as_str()));

    let (height, mut widths) = if fully_declared {
        (def.height.unwrap_or_default(), HashMap::new())
    } else {
        let metrics = probe.sheet(&def.file, &def.chars, def.height)?;
        (metrics.height, metrics.widths)
    };
    if height == 0 {
        return Err(HudError::invalid("height", "glyph height must be > 0"));
    }
    widths.extend(declared_widths(def, height)?);

    let icons = def
        .icons
        .iter()
        .map(|icon| resolve_icon(icon, probe, namespace))
        .collect::<HudResult<Vec<_>>>()?;

    Ok(TextFontResource {
        name: def.name.clone(),
        file: format!("{namespace}:{}", def.file),
        rows: def.chars.clone(),
        height,
        widths,
        icons,
        conditions: def.conditions.clone(),
    })
}

fn resolve_background(
    def: &BackgroundDef,
    probe: &dyn ImageProbe,
    namespace: &str,
) -> HudResult<BackgroundResource> {
    Ok(BackgroundResource {
        name: def.name.clone(),
        left: Bitmap::resolve(&def.left, probe, namespace)?,
        body: Bitmap::resolve(&def.body, probe, namespace)?,
        right: Bitmap::resolve(&def.right, probe, namespace)?,
        location: def.location,
    })
}
