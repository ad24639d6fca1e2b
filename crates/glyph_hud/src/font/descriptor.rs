//! Glyph descriptor emitter
//!
//! Collects bitmap-font provider records per font file during a reload and
//! turns them into the JSON documents the client loads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::allocator::TEXT_SPACE_CODEPOINT;
use super::shader::HudShader;
use crate::component::{FontKey, SPACE_CENTER_CODEPOINT};

/// One provider entry of a font document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Provider {
    /// Bitmap glyphs
    Bitmap {
        /// Texture reference, `namespace:path`
        file: String,
        /// Vertical placement
        ascent: i32,
        /// Displayed height
        height: i32,
        /// One string per texture row
        chars: Vec<String>,
    },
    /// Invisible glyphs with fixed advances
    Space {
        /// Advance per character
        advances: IndexMap<String, i32>,
    },
}

impl Provider {
    /// Bitmap record for a single codepoint
    pub fn single(file: &str, ascent: i32, height: i32, codepoint: u32) -> Self {
        Self::Bitmap {
            file: file.to_string(),
            ascent,
            height,
            chars: vec![codepoint_string(codepoint)],
        }
    }
}

/// A font file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDocument {
    /// Font key the document is loaded as
    pub font: FontKey,
    /// Providers in load order
    pub providers: Vec<Provider>,
}

#[derive(Serialize)]
struct DocumentBody<'a> {
    providers: &'a [Provider],
}

impl FontDocument {
    /// Relative output path, `<namespace>/font/<path>.json`
    pub fn relative_path(&self) -> String {
        let key = self.font.as_str();
        let namespace = key.split_once(':').map_or("minecraft", |(ns, _)| ns);
        format!("{namespace}/font/{}.json", self.font.path())
    }

    /// Serialized document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&DocumentBody {
            providers: &self.providers,
        })
    }

    /// Number of bitmap records
    pub fn bitmap_count(&self) -> usize {
        self.providers
            .iter()
            .filter(|p| matches!(p, Provider::Bitmap { .. }))
            .count()
    }

    /// The signed spacer font covering `[-range, range]`
    pub fn space_font(namespace: &str, range: i32) -> Self {
        let advances = (-range..=range)
            .filter(|&n| n != 0)
            .map(|n| (codepoint_string(SPACE_CENTER_CODEPOINT.wrapping_add_signed(n)), n))
            .collect();
        Self {
            font: FontKey::space(namespace),
            providers: vec![Provider::Space { advances }],
        }
    }
}

/// Codepoint as a one-character string, replacement character when invalid
pub fn codepoint_string(codepoint: u32) -> String {
    char::from_u32(codepoint)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

/// Clamp a requested ascent into the client's supported range
///
/// Offsets outside the range are drawn at the nearest bound; nothing splits
/// them across several records.
pub fn create_bit(max_ascent: i32, offset: i32, emit: impl FnOnce(i32)) {
    let clamped = offset.clamp(-max_ascent, max_ascent);
    if clamped != offset {
        log::debug!("ascent {offset} clamped to {clamped}");
    }
    emit(clamped);
}

/// Batches provider records per font file
#[derive(Debug)]
pub struct DescriptorEmitter {
    max_ascent: i32,
    documents: IndexMap<FontKey, Vec<Provider>>,
    shaders: IndexMap<HudShader, u32>,
}

impl DescriptorEmitter {
    /// Emitter clamping ascents to `max_ascent`
    pub fn new(max_ascent: i32) -> Self {
        Self {
            max_ascent,
            documents: IndexMap::new(),
            shaders: IndexMap::new(),
        }
    }

    /// Start a text line font with its space provider
    ///
    /// `' '` advances 4; the inter-character spacer advances `space` and is
    /// only declared when non-zero.
    pub fn start_line_font(&mut self, font: &FontKey, space: i32) {
        let mut advances = IndexMap::new();
        advances.insert(" ".to_string(), 4);
        if space != 0 {
            advances.insert(codepoint_string(TEXT_SPACE_CODEPOINT), space);
        }
        self.documents
            .entry(font.clone())
            .or_default()
            .insert(0, Provider::Space { advances });
    }

    /// Register a shader; returns its stable id within this reload
    pub fn shader_id(&mut self, shader: &HudShader) -> u32 {
        let next = u32::try_from(self.shaders.len()).unwrap_or(u32::MAX);
        *self.shaders.entry(*shader).or_insert(next)
    }

    /// Clamp `offset` and append the record built from it to `font`
    pub fn emit(
        &mut self,
        font: &FontKey,
        shader: &HudShader,
        offset: i32,
        record: impl FnOnce(i32) -> Provider,
    ) {
        self.shader_id(shader);
        let providers = self.documents.entry(font.clone()).or_default();
        create_bit(self.max_ascent, offset, |ascent| providers.push(record(ascent)));
    }

    /// Records emitted so far for `font`
    pub fn providers(&self, font: &FontKey) -> &[Provider] {
        self.documents.get(font).map_or(&[], Vec::as_slice)
    }

    /// Distinct shaders in registration order
    pub fn shaders(&self) -> impl Iterator<Item = &HudShader> {
        self.shaders.keys()
    }

    /// Finish the reload and hand out every document
    pub fn finish(self) -> (Vec<FontDocument>, Vec<HudShader>) {
        let documents = self
            .documents
            .into_iter()
            .map(|(font, providers)| FontDocument { font, providers })
            .collect();
        (documents, self.shaders.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{GuiLocation, RenderScale};
    use pretty_assertions::assert_eq;

    fn shader() -> HudShader {
        HudShader {
            gui: GuiLocation::new(50.0, 50.0),
            render_scale: RenderScale::default(),
            layer: 0,
            outline: false,
            opacity: 1.0,
            property: 0,
        }
    }

    #[test]
    fn test_create_bit_clamps() {
        let mut seen = Vec::new();
        for offset in [-9000, -20, 0, 8192, 9000] {
            create_bit(8192, offset, |y| seen.push(y));
        }
        assert_eq!(seen, vec![-8192, -20, 0, 8192, 8192]);
    }

    #[test]
    fn test_emit_records_one_bitmap() {
        let font = FontKey::new("hud", "popup/status/image");
        let mut emitter = DescriptorEmitter::new(100);
        emitter.emit(&font, &shader(), 250, |y| {
            Provider::single("hud:heart.png", y, 9, 0x10_0001)
        });
        assert_eq!(
            emitter.providers(&font),
            &[Provider::Bitmap {
                file: "hud:heart.png".to_string(),
                ascent: 100,
                height: 9,
                chars: vec!["\u{100001}".to_string()],
            }]
        );
        assert_eq!(emitter.shaders().count(), 1);
    }

    #[test]
    fn test_line_font_starts_with_space_provider() {
        let font = FontKey::new("hud", "popup/status/text_1_1");
        let mut emitter = DescriptorEmitter::new(8192);
        emitter.emit(&font, &shader(), 0, |y| Provider::single("hud:a.png", y, 8, 0xC0001));
        emitter.start_line_font(&font, 2);
        let (documents, shaders) = emitter.finish();
        assert_eq!(shaders.len(), 1);
        let doc = &documents[0];
        assert_eq!(doc.relative_path(), "hud/font/popup/status/text_1_1.json");
        assert_eq!(doc.bitmap_count(), 1);
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["providers"][0]["type"], "space");
        assert_eq!(json["providers"][0]["advances"][" "], 4);
        assert_eq!(json["providers"][0]["advances"]["\u{C0000}"], 2);
        assert_eq!(json["providers"][1]["type"], "bitmap");
    }

    #[test]
    fn test_space_font_covers_range() {
        let doc = FontDocument::space_font("hud", 3);
        assert_eq!(doc.font.as_str(), "hud:space");
        match &doc.providers[0] {
            Provider::Space { advances } => {
                assert_eq!(advances.len(), 6);
                assert_eq!(advances.get("\u{CFFFD}"), Some(&-3));
                assert_eq!(advances.get("\u{D0003}"), Some(&3));
            }
            Provider::Bitmap { .. } => panic!("expected a space provider"),
        }
    }
}
