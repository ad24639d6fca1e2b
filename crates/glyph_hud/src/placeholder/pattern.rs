//! Placeholder substitution in free text
//!
//! `[name]` and `[name:arg1,arg2]` are replaced by the producer's value;
//! `\[` is a literal bracket.

use super::registry::{split_reference, PlaceholderRegistry, Producer};
use crate::error::{HudError, HudResult};
use crate::subject::Subject;

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Placeholder(Producer),
}

/// A string with compiled placeholders
#[derive(Debug, Clone)]
pub struct PlaceholderPattern {
    segments: Vec<Segment>,
}

impl PlaceholderPattern {
    /// Compile `pattern`, resolving every placeholder through `registry`
    pub fn compile(pattern: &str, registry: &PlaceholderRegistry) -> HudResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some('[') => literal.push('['),
                    Some(other) => {
                        literal.push('\\');
                        literal.push(other);
                    }
                    None => literal.push('\\'),
                },
                '[' => {
                    let mut reference = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == ']' {
                            closed = true;
                            break;
                        }
                        reference.push(inner);
                    }
                    if !closed {
                        return Err(HudError::Pattern(format!(
                            "unclosed placeholder in '{pattern}'"
                        )));
                    }
                    let (name, args) = split_reference(reference.trim());
                    let producer = registry.lookup(name, &args)?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(producer));
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Substituted text for `subject`
    pub fn render(&self, subject: &dyn Subject) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(producer) => out.push_str(&producer.string(subject)),
            }
        }
        out
    }

    /// Whether the output never depends on the subject
    pub fn is_constant(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }
}
