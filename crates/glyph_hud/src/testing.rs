//! Shared fixtures for unit tests

use crate::config::{Config, HudSettings};
use crate::definition::LayoutBundle;
use crate::placeholder::PlaceholderRegistry;
use crate::reload::ReloadContext;
use crate::resource::{NoProbe, ResourceSet};

/// Resources used across element and composer tests
///
/// * `heart` 9x9, `blink` two frames 4 and 5 wide, `gauge` listener on `ratio`
/// * text `default`: `a` 5, `b` 3, `1` 2 wide, icon `coin` 8x8
/// * background `plate`: caps 2, body 4, all 10 high
/// * head `face` with 2px pixels
pub const RESOURCES: &str = r##"
[[images]]
name = "heart"
frames = [{ file = "image/heart.png", width = 9, height = 9 }]

[[images]]
name = "blink"
frames = [
    { file = "image/blink_1.png", width = 4, height = 4 },
    { file = "image/blink_2.png", width = 5, height = 4 },
]

[[images]]
name = "gauge"
listener = "[number:ratio]"
frames = [
    { file = "image/gauge_1.png", width = 5, height = 6 },
    { file = "image/gauge_2.png", width = 6, height = 6 },
]

[[texts]]
name = "default"
file = "font/default.png"
chars = ["ab1"]
height = 8
widths = { a = 5, b = 3, "1" = 2 }
icons = [{ name = "coin", file = "icon/coin.png", width = 8, height = 8 }]

[[backgrounds]]
name = "plate"
left = { file = "background/left.png", width = 2, height = 10 }
body = { file = "background/body.png", width = 4, height = 10 }
right = { file = "background/right.png", width = 2, height = 10 }

[[heads]]
name = "face"
pixel = 2
"##;

/// Settings, registry and resolved resources
pub struct Fixture {
    pub settings: HudSettings,
    pub registry: PlaceholderRegistry,
    pub resources: ResourceSet,
}

impl Fixture {
    pub fn new() -> Self {
        let bundle = LayoutBundle::load_from_str(RESOURCES, "fixture.toml").unwrap();
        let (resources, warnings) = ResourceSet::compile(&bundle, &NoProbe, "hud");
        assert!(warnings.is_empty(), "{warnings:?}");
        Self {
            settings: HudSettings::default(),
            registry: PlaceholderRegistry::with_builtins(),
            resources,
        }
    }

    pub fn context(&self) -> ReloadContext<'_> {
        ReloadContext::new(&self.settings, &self.registry, &self.resources)
    }
}
