//! Text pattern compiler
//!
//! A pattern goes through placeholder substitution, legacy code translation,
//! tag tokenizing and number reformatting, and comes out as a stream of
//! styled characters ready for line layout.

use regex::{Captures, Regex};

use super::equation::Equation;
use super::markup::{tokenize, translate_legacy, StyleStack, Token};
use super::number_format::NumberFormat;
use crate::component::Style;
use crate::config::LegacySerializer;
use crate::error::{HudError, HudResult};
use crate::placeholder::{PlaceholderPattern, PlaceholderRegistry};
use crate::subject::Subject;

/// One entry of the styled character stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyledChar {
    /// A character of the text font
    Char {
        /// Character
        ch: char,
        /// Tint and decorations
        style: Style,
    },
    /// An inline icon by name
    Icon(String),
    /// A signed spacer
    Space(i32),
}

/// Rewrites every decimal number in plain text
#[derive(Debug, Clone)]
pub struct NumberFormatter {
    equation: Equation,
    format: NumberFormat,
    matcher: Regex,
}

impl NumberFormatter {
    /// Formatter applying `equation` then `format`
    pub fn new(equation: Equation, format: NumberFormat) -> HudResult<Self> {
        let matcher =
            Regex::new(r"[0-9]+(\.[0-9]+)?").map_err(|e| HudError::Pattern(e.to_string()))?;
        Ok(Self {
            equation,
            format,
            matcher,
        })
    }

    /// Reformat every number in `text`, keeping any that fail to evaluate
    pub fn reformat(&self, text: &str) -> String {
        self.matcher
            .replace_all(text, |caps: &Captures<'_>| {
                let found = &caps[0];
                found
                    .parse::<f64>()
                    .ok()
                    .and_then(|n| self.equation.evaluate(n))
                    .map_or_else(|| found.to_string(), |n| self.format.format(n))
            })
            .into_owned()
    }
}

/// Compile-time switches of a text pattern
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Style before any tag
    pub base: Style,
    /// Legacy code prefix to translate, `None` leaves codes alone
    pub legacy: Option<LegacySerializer>,
    /// Number reformatting, `None` leaves numbers alone
    pub numbers: Option<NumberFormatter>,
}

/// A compiled text pattern
#[derive(Debug, Clone)]
pub struct TextPattern {
    placeholders: PlaceholderPattern,
    options: TextOptions,
}

impl TextPattern {
    /// Compile `pattern`, resolving placeholders through `registry`
    pub fn compile(
        pattern: &str,
        registry: &PlaceholderRegistry,
        options: TextOptions,
    ) -> HudResult<Self> {
        Ok(Self {
            placeholders: PlaceholderPattern::compile(pattern, registry)?,
            options,
        })
    }

    /// Styled characters for `subject`
    pub fn render(&self, subject: &dyn Subject) -> Vec<StyledChar> {
        self.style_text(&self.placeholders.render(subject))
    }

    /// Styled characters for already substituted text
    pub fn style_text(&self, text: &str) -> Vec<StyledChar> {
        let translated;
        let text = match self.options.legacy {
            Some(serializer) => {
                translated = translate_legacy(text, serializer);
                translated.as_str()
            }
            None => text,
        };

        let mut out = Vec::with_capacity(text.len());
        let mut styles = StyleStack::new(self.options.base.clone());
        for token in tokenize(text) {
            if styles.apply(&token) {
                continue;
            }
            match token {
                Token::Text(plain) => {
                    let plain = match &self.options.numbers {
                        Some(numbers) => numbers.reformat(&plain),
                        None => plain,
                    };
                    out.extend(plain.chars().map(|ch| StyledChar::Char {
                        ch,
                        style: styles.current().clone(),
                    }));
                }
                Token::Image(name) => out.push(StyledChar::Icon(name)),
                Token::Space(n) => out.push(StyledChar::Space(n)),
                Token::Color(_) | Token::Decorate(_) | Token::Close | Token::Reset => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Decorations, NamedColor, TextColor};
    use crate::subject::SubjectState;
    use pretty_assertions::assert_eq;

    fn plain(chars: &[StyledChar]) -> String {
        chars
            .iter()
            .map(|c| match c {
                StyledChar::Char { ch, .. } => ch.to_string(),
                StyledChar::Icon(name) => format!("{{{name}}}"),
                StyledChar::Space(n) => format!("({n})"),
            })
            .collect()
    }

    fn formatter(equation: &str, format: &str) -> NumberFormatter {
        NumberFormatter::new(
            Equation::parse(equation).unwrap(),
            NumberFormat::parse(format).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_number_reformatting() {
        let numbers = formatter("t * 2", "#,###.#");
        assert_eq!(numbers.reformat("hp 600.25 / 1000"), "hp 1,200.5 / 2,000");
        let failing = formatter("1 / (t - 3)", "#.#");
        assert_eq!(failing.reformat("3 and 4"), "3 and 1");
    }

    #[test]
    fn test_pipeline_order() {
        let registry = PlaceholderRegistry::with_builtins();
        let options = TextOptions {
            base: Style::colored(TextColor::WHITE),
            legacy: Some(LegacySerializer::Ampersand),
            numbers: Some(formatter("t", "#,###")),
        };
        let pattern = TextPattern::compile(
            "&c[number:gold]<space:2><image:coin>",
            &registry,
            options,
        )
        .unwrap();
        let subject = SubjectState::new("alex").with_attribute("gold", 12000.0);
        let chars = pattern.render(&subject);
        assert_eq!(plain(&chars), "12,000(2){coin}");
        match &chars[0] {
            StyledChar::Char { style, .. } => {
                assert_eq!(style.color, Some(NamedColor::Red.color()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_tags_are_not_reformatted() {
        let registry = PlaceholderRegistry::with_builtins();
        let options = TextOptions {
            numbers: Some(formatter("t * 10", "#")),
            ..TextOptions::default()
        };
        let pattern = TextPattern::compile("<space:5><#112233>1", &registry, options).unwrap();
        assert_eq!(plain(&pattern.render(&SubjectState::new("a"))), "(5)10");
    }

    #[test]
    fn test_decorations_reach_characters() {
        let registry = PlaceholderRegistry::with_builtins();
        let pattern =
            TextPattern::compile("<b>a</b>b", &registry, TextOptions::default()).unwrap();
        let chars = pattern.render(&SubjectState::new("a"));
        let decorations: Vec<_> = chars
            .iter()
            .filter_map(|c| match c {
                StyledChar::Char { style, .. } => Some(style.decorations),
                _ => None,
            })
            .collect();
        assert_eq!(decorations, vec![Decorations::BOLD, Decorations::empty()]);
    }
}
