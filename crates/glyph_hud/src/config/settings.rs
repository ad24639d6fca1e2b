//! Global engine settings
//!
//! Defaults applied to every element that does not override them, plus the
//! knobs of the reload itself.

use serde::{Deserialize, Serialize};

use super::Config;

/// Which legacy colour-code prefix is translated into markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LegacySerializer {
    /// `&a`, `&l`, ...
    #[default]
    Ampersand,
    /// `§a`, `§l`, ...
    Section,
}

impl LegacySerializer {
    /// The prefix character for this serializer
    pub fn prefix(self) -> char {
        match self {
            Self::Ampersand => '&',
            Self::Section => '§',
        }
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HudSettings {
    /// Resource namespace used for font keys and file references
    pub namespace: String,
    /// Default number format applied by automatic number reformatting
    pub number_format: String,
    /// Default equation applied to every number before formatting
    pub number_equation: String,
    /// Whether automatic number reformatting is off unless an element enables it
    pub disable_number_format: bool,
    /// Whether legacy colour codes are translated by default
    pub use_legacy_format: bool,
    /// Legacy colour-code prefix
    pub legacy_serializer: LegacySerializer,
    /// Largest supported ascent magnitude; offsets are clamped into this range
    pub max_ascent: i32,
    /// Largest spacer magnitude declared in the space font
    pub space_range: i32,
    /// Worker count for parallel reloads, `None` uses available parallelism
    pub worker_threads: Option<usize>,
    /// Default text colour as `#rrggbb`
    pub default_color: String,
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            namespace: "hud".to_string(),
            number_format: "#,###.#".to_string(),
            number_equation: "t".to_string(),
            disable_number_format: true,
            use_legacy_format: false,
            legacy_serializer: LegacySerializer::Ampersand,
            max_ascent: 8192,
            space_range: 8192,
            worker_threads: None,
            default_color: "#ffffff".to_string(),
        }
    }
}

impl Config for HudSettings {}

impl HudSettings {
    /// Number of reload workers to spawn
    pub fn worker_count(&self) -> usize {
        self.worker_threads
            .filter(|&n| n > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_keys_and_defaults() {
        let settings =
            HudSettings::load_from_str("number-format = \"0.0\"\nworker-threads = 3", "a.toml")
                .unwrap();
        assert_eq!(settings.number_format, "0.0");
        assert_eq!(settings.worker_count(), 3);
        assert!(settings.disable_number_format);
        assert_eq!(settings.legacy_serializer.prefix(), '&');
    }

    #[test]
    fn test_zero_workers_falls_back_to_parallelism() {
        let settings = HudSettings {
            worker_threads: Some(0),
            ..HudSettings::default()
        };
        assert!(settings.worker_count() >= 1);
    }
}
