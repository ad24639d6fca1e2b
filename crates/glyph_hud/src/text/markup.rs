//! Inline tags and rich-text markup
//!
//! Tags are `<...>` groups. `<image:NAME>` and `<space:N>` become icon and
//! spacer tokens; colour and decoration tags push onto a style stack that
//! closing tags pop. Anything not understood stays literal text.

use crate::component::{Decorations, NamedColor, Style, TextColor};
use crate::config::LegacySerializer;

/// One piece of a tokenized pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Plain text
    Text(String),
    /// Inline icon by name
    Image(String),
    /// Signed spacer
    Space(i32),
    /// Push a tinted style
    Color(TextColor),
    /// Push a decorated style
    Decorate(Decorations),
    /// Pop the most recent style
    Close,
    /// Drop every pushed style
    Reset,
}

fn is_tag_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn decoration(name: &str) -> Option<Decorations> {
    Some(match name {
        "bold" | "b" => Decorations::BOLD,
        "italic" | "i" | "em" => Decorations::ITALIC,
        "underlined" | "u" => Decorations::UNDERLINED,
        "strikethrough" | "st" => Decorations::STRIKETHROUGH,
        "obfuscated" | "obf" => Decorations::OBFUSCATED,
        _ => return None,
    })
}

/// Interpret the inside of `<...>`; `None` keeps the tag as literal text
fn parse_tag(inner: &str) -> Option<Option<Token>> {
    if inner.starts_with('/') {
        return Some(Some(Token::Close));
    }
    let lower = inner.to_ascii_lowercase();
    if lower == "reset" || lower == "r" {
        return Some(Some(Token::Reset));
    }
    if let Some((kind, value)) = inner.split_once(':') {
        return match kind {
            "image" if is_tag_name(value) => Some(Some(Token::Image(value.to_string()))),
            "space" if is_tag_name(value) => Some(value.parse().ok().map(Token::Space)),
            "color" | "colour" | "c" => TextColor::parse(value).map(|c| Some(Token::Color(c))),
            _ => None,
        };
    }
    let color = if inner.starts_with('#') {
        TextColor::parse(inner)
    } else {
        NamedColor::from_name(&lower).map(NamedColor::color)
    };
    if let Some(color) = color {
        return Some(Some(Token::Color(color)));
    }
    decoration(&lower).map(|d| Some(Token::Decorate(d)))
}

/// Split `input` into text and tag tokens; `\<` is a literal bracket
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        match c {
            '\\' if rest[1..].starts_with('<') => {
                text.push('<');
                rest = &rest[2..];
            }
            '<' => {
                let tag = rest[1..].find(['<', '>']).and_then(|end| {
                    let inner = &rest[1..=end];
                    rest[1 + end..]
                        .starts_with('>')
                        .then(|| parse_tag(inner).map(|token| (token, end + 2)))
                        .flatten()
                });
                match tag {
                    Some((token, consumed)) => {
                        if !text.is_empty() {
                            tokens.push(Token::Text(std::mem::take(&mut text)));
                        }
                        tokens.extend(token);
                        rest = &rest[consumed..];
                    }
                    None => {
                        text.push('<');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

/// Rewrite legacy colour codes into markup tags
///
/// A colour code also clears previous decorations, as it does in the client.
pub fn translate_legacy(input: &str, serializer: LegacySerializer) -> String {
    let prefix = serializer.prefix();
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != prefix {
            out.push(c);
            continue;
        }
        let Some(&code) = chars.peek() else {
            out.push(c);
            continue;
        };
        let lower = code.to_ascii_lowercase();
        let replacement = if let Some(color) = NamedColor::from_legacy(lower) {
            Some(format!("<reset><{}>", color.name()))
        } else if lower == '#' {
            let hex: String = chars.clone().skip(1).take(6).collect();
            (hex.len() == 6 && hex.chars().all(|h| h.is_ascii_hexdigit())).then(|| {
                for _ in 0..6 {
                    chars.next();
                }
                format!("<reset><#{hex}>")
            })
        } else {
            match lower {
                'k' => Some("<obfuscated>".to_string()),
                'l' => Some("<bold>".to_string()),
                'm' => Some("<strikethrough>".to_string()),
                'n' => Some("<underlined>".to_string()),
                'o' => Some("<italic>".to_string()),
                'r' => Some("<reset>".to_string()),
                _ => None,
            }
        };
        match replacement {
            Some(tag) => {
                chars.next();
                out.push_str(&tag);
            }
            None => out.push(c),
        }
    }
    out
}

/// Style stack driven by tag tokens
#[derive(Debug, Clone)]
pub struct StyleStack {
    base: Style,
    stack: Vec<Style>,
}

impl StyleStack {
    /// Stack starting at `base`
    pub fn new(base: Style) -> Self {
        Self {
            base,
            stack: Vec::new(),
        }
    }

    /// Style currently in effect
    pub fn current(&self) -> &Style {
        self.stack.last().unwrap_or(&self.base)
    }

    /// Apply a style token; returns `false` for non-style tokens
    pub fn apply(&mut self, token: &Token) -> bool {
        match token {
            Token::Color(color) => {
                let mut next = self.current().clone();
                next.color = Some(*color);
                self.stack.push(next);
            }
            Token::Decorate(decorations) => {
                let mut next = self.current().clone();
                next.decorations |= *decorations;
                self.stack.push(next);
            }
            Token::Close => {
                self.stack.pop();
            }
            Token::Reset => self.stack.clear(),
            Token::Text(_) | Token::Image(_) | Token::Space(_) => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_tags() {
        assert_eq!(
            tokenize("hp <image:heart><space:-3>!"),
            vec![
                Token::Text("hp ".to_string()),
                Token::Image("heart".to_string()),
                Token::Space(-3),
                Token::Text("!".to_string()),
            ]
        );
        assert_eq!(tokenize("<space:abc>x"), vec![Token::Text("x".to_string())]);
    }

    #[test]
    fn test_style_tags() {
        assert_eq!(
            tokenize("<red>a</red><#00ff00><b>b<reset>"),
            vec![
                Token::Color(NamedColor::Red.color()),
                Token::Text("a".to_string()),
                Token::Close,
                Token::Color(TextColor(0x00FF00)),
                Token::Decorate(Decorations::BOLD),
                Token::Text("b".to_string()),
                Token::Reset,
            ]
        );
    }

    #[test]
    fn test_unknown_and_broken_tags_stay_literal() {
        assert_eq!(
            tokenize("a <wobble> < b \\<red>"),
            vec![Token::Text("a <wobble> < b <red>".to_string())]
        );
        assert_eq!(tokenize("x<<red>"), vec![
            Token::Text("x<".to_string()),
            Token::Color(NamedColor::Red.color()),
        ]);
    }

    #[test]
    fn test_legacy_translation() {
        let translated = translate_legacy("&cHP &l&#00ff00ok &zx&", LegacySerializer::Ampersand);
        assert_eq!(translated, "<reset><red>HP <bold><reset><#00ff00>ok &zx&");
        assert_eq!(translate_legacy("§ahi", LegacySerializer::Section), "<reset><green>hi");
        assert_eq!(translate_legacy("&ahi", LegacySerializer::Section), "&ahi");
    }

    #[test]
    fn test_style_stack() {
        let mut stack = StyleStack::new(Style::colored(TextColor::WHITE));
        stack.apply(&Token::Color(TextColor(0xFF0000)));
        stack.apply(&Token::Decorate(Decorations::ITALIC));
        assert_eq!(stack.current().color, Some(TextColor(0xFF0000)));
        assert!(stack.current().decorations.contains(Decorations::ITALIC));
        stack.apply(&Token::Close);
        assert!(stack.current().decorations.is_empty());
        stack.apply(&Token::Close);
        stack.apply(&Token::Close);
        assert_eq!(stack.current().color, Some(TextColor::WHITE));
        stack.apply(&Token::Decorate(Decorations::BOLD));
        stack.apply(&Token::Reset);
        assert!(stack.current().decorations.is_empty());
    }
}
