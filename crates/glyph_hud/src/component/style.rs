//! Glyph styling
//!
//! A style is what the client needs besides the codepoint: which font the
//! codepoint lives in, its tint and its decorations.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

bitflags! {
    /// Text decorations understood by the client
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Decorations: u8 {
        /// Bold
        const BOLD = 1;
        /// Italic
        const ITALIC = 1 << 1;
        /// Underlined
        const UNDERLINED = 1 << 2;
        /// Strikethrough
        const STRIKETHROUGH = 1 << 3;
        /// Obfuscated
        const OBFUSCATED = 1 << 4;
    }
}

/// 24-bit RGB tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextColor(pub u32);

impl TextColor {
    /// White, the client default
    pub const WHITE: Self = Self(0x00FF_FFFF);

    /// Build from components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parse `#rrggbb` (leading `#` optional) or a named colour
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(named) = NamedColor::from_name(value) {
            return Some(named.color());
        }
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self)
    }

    /// Red, green and blue components
    pub const fn components(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// The sixteen named client colours, in legacy code order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    const ALL: [Self; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    /// Markup name, e.g. `dark_red`
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::DarkBlue => "dark_blue",
            Self::DarkGreen => "dark_green",
            Self::DarkAqua => "dark_aqua",
            Self::DarkRed => "dark_red",
            Self::DarkPurple => "dark_purple",
            Self::Gold => "gold",
            Self::Gray => "gray",
            Self::DarkGray => "dark_gray",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Aqua => "aqua",
            Self::Red => "red",
            Self::LightPurple => "light_purple",
            Self::Yellow => "yellow",
            Self::White => "white",
        }
    }

    /// RGB value
    pub const fn color(self) -> TextColor {
        TextColor(match self {
            Self::Black => 0x000000,
            Self::DarkBlue => 0x0000AA,
            Self::DarkGreen => 0x00AA00,
            Self::DarkAqua => 0x00AAAA,
            Self::DarkRed => 0xAA0000,
            Self::DarkPurple => 0xAA00AA,
            Self::Gold => 0xFFAA00,
            Self::Gray => 0xAAAAAA,
            Self::DarkGray => 0x555555,
            Self::Blue => 0x5555FF,
            Self::Green => 0x55FF55,
            Self::Aqua => 0x55FFFF,
            Self::Red => 0xFF5555,
            Self::LightPurple => 0xFF55FF,
            Self::Yellow => 0xFFFF55,
            Self::White => 0xFFFFFF,
        })
    }

    /// Look up by markup name (`grey` spelling accepted)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let name = match name.as_str() {
            "grey" => "gray",
            "dark_grey" => "dark_gray",
            other => other,
        };
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Look up by legacy code digit (`0`-`9`, `a`-`f`)
    pub fn from_legacy(code: char) -> Option<Self> {
        code.to_digit(16).map(|d| Self::ALL[d as usize])
    }
}

/// Reference to a font resource, `namespace:path`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontKey(Arc<str>);

impl FontKey {
    /// Build a key from namespace and path
    pub fn new(namespace: &str, path: &str) -> Self {
        Self(format!("{namespace}:{path}").into())
    }

    /// The font holding signed spacer codepoints
    pub fn space(namespace: &str) -> Self {
        Self::new(namespace, "space")
    }

    /// Full `namespace:path` string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path part, after the namespace separator
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(&self.0, |(_, p)| p)
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Styling attached to one glyph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Tint, `None` inherits the client default
    pub color: Option<TextColor>,
    /// Decorations
    pub decorations: Decorations,
    /// Font the codepoint is bound in, `None` until a line font is applied
    pub font: Option<FontKey>,
}

impl Style {
    /// Style with only a colour
    pub fn colored(color: TextColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Same style bound to a font
    pub fn with_font(mut self, font: FontKey) -> Self {
        self.font = Some(font);
        self
    }
}
