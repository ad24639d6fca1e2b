//! End-to-end reloads against real files on disk

use std::path::Path;

use glyph_hud::component::Glyph;
use glyph_hud::prelude::*;
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;

const LAYOUTS: &str = r##"
[[images]]
name = "heart"
frames = [{ file = "image/heart.png" }]

[[texts]]
name = "default"
file = "font/default.png"
chars = ["ab"]

[[layouts]]
name = "status"

[[layouts.images]]
image = "heart"

[[layouts.texts]]
name = "default"
pattern = "ab"
location = { x = 0, y = -12 }

[[layouts.texts]]
name = "default"
pattern = "a"
conditions = [{ first = "number:health", second = "'low'", operation = "==" }]

[[layouts]]
name = "target"

[[layouts.texts]]
name = "default"
pattern = "b"
follow = "[string:target]"

[[huds]]
name = "main"
layouts = [{ name = "status", gui = { x = 50.0, y = 100.0 } }]

[[popups]]
name = "target"
layouts = [{ name = "target" }]
move-locations = [{ pixel = { x = 0, y = 0 } }, { pixel = { x = 0, y = -20 } }]
"##;

fn opaque() -> Rgba<u8> {
    Rgba([255, 255, 255, 255])
}

fn write_assets(root: &Path) {
    std::fs::create_dir_all(root.join("image")).unwrap();
    std::fs::create_dir_all(root.join("font")).unwrap();
    RgbaImage::from_pixel(9, 9, opaque())
        .save(root.join("image/heart.png"))
        .unwrap();

    // two 8px cells: "a" 5 wide, "b" 3 wide
    let mut sheet = RgbaImage::new(16, 8);
    for y in 0..8 {
        for x in 0..5 {
            sheet.put_pixel(x, y, opaque());
        }
        for x in 8..11 {
            sheet.put_pixel(x, y, opaque());
        }
    }
    sheet.save(root.join("font/default.png")).unwrap();
}

fn engine(root: &Path) -> HudEngine {
    let settings_path = root.join("settings.toml");
    std::fs::write(&settings_path, "worker-threads = 2\n").unwrap();
    let settings = HudSettings::load_from_file(&settings_path).unwrap();
    HudEngine::new(
        settings,
        PlaceholderRegistry::with_builtins(),
        DirectoryProbe::new(root),
    )
}

fn bundle(root: &Path) -> LayoutBundle {
    let path = root.join("layouts.toml");
    std::fs::write(&path, LAYOUTS).unwrap();
    LayoutBundle::load_tagged(&path).unwrap()
}

#[test]
fn test_probed_resources_render_exact_widths() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let engine = engine(dir.path());
    let report = engine.reload(&bundle(dir.path()));

    assert_eq!(report.displays, 2);
    assert_eq!(report.warnings.len(), 1);
    let warning = &report.warnings[0];
    assert_eq!(warning.display, "main");
    assert_eq!(warning.element, "status/texts[1]");
    assert_eq!(warning.source, "layouts.toml");
    assert!(warning.reason.contains("type mismatch"));

    let generation = engine.current();
    let player = SubjectState::new("alex").with_attribute("health", 12.0);
    let out = generation
        .render_hud("main", &RenderContext::detached(), &player)
        .unwrap();
    // "ab" is 6 + 4 pixels, wider than the 9px heart
    assert_eq!(out.width(), 10);
    let visible = out
        .glyphs()
        .iter()
        .filter(|glyph| matches!(glyph, Glyph::Char { .. }))
        .count();
    assert_eq!(visible, 3);
}

#[test]
fn test_follow_and_slots() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let engine = engine(dir.path());
    engine.reload(&bundle(dir.path()));
    let generation = engine.current();

    let player = SubjectState::new("alex").with_attribute("target", "steve");
    let mut others = SubjectMap::new();
    let skins = AttributeSkinProvider::default();

    let render = |directory: &SubjectMap, slot: usize| {
        generation
            .render_popup("target", &RenderContext::new(directory, &skins), &player, slot, 0)
            .unwrap()
    };
    assert!(render(&others, 0).is_empty());

    others.insert(SubjectState::new("steve"));
    assert_eq!(render(&others, 0).width(), 4);
    assert_eq!(render(&others, 1).width(), 4);
    assert!(render(&others, 2).is_empty());
}

#[test]
fn test_pack_contains_deduplicated_bindings() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let engine = engine(dir.path());
    engine.reload(&bundle(dir.path()));
    let generation = engine.current();

    let out = tempfile::tempdir().unwrap();
    let mut writer = DirectoryPackWriter::new(out.path());
    generation.write_pack(&mut writer).unwrap();

    let json = std::fs::read_to_string(out.path().join("hud/font/hud/main/image.json")).unwrap();
    let document: serde_json::Value = serde_json::from_str(&json).unwrap();
    let providers = document["providers"].as_array().unwrap();
    let hearts: Vec<_> = providers
        .iter()
        .filter(|p| p["file"] == "hud:image/heart.png")
        .collect();
    assert_eq!(hearts.len(), 1);
    assert_eq!(hearts[0]["height"], 9);
    assert_eq!(hearts[0]["type"], "bitmap");

    // the popup slots share one line font per ascent
    let line_fonts = generation
        .fonts()
        .iter()
        .filter(|doc| doc.font.path().starts_with("text/default/"))
        .count();
    assert_eq!(line_fonts, 3);
}
