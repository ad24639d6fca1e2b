//! Named value producers
//!
//! Placeholders are looked up once at compile time. The lookup fixes the
//! value kind, so everything downstream can be type-checked before the first
//! tick.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::value::{Value, ValueKind};
use crate::error::{HudError, HudResult};
use crate::subject::Subject;

type ProducerFn = dyn Fn(&dyn Subject) -> Value + Send + Sync;

/// A compiled placeholder yielding one value kind per subject
#[derive(Clone)]
pub struct Producer {
    kind: ValueKind,
    func: Arc<ProducerFn>,
}

impl Producer {
    /// Wrap a closure; it must always yield values of `kind`
    pub fn new<F>(kind: ValueKind, func: F) -> Self
    where
        F: Fn(&dyn Subject) -> Value + Send + Sync + 'static,
    {
        Self {
            kind,
            func: Arc::new(func),
        }
    }

    /// Producer returning the same value for every subject
    pub fn constant(value: Value) -> Self {
        Self::new(value.kind(), move |_| value.clone())
    }

    /// Value kind
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Value for `subject`
    pub fn value(&self, subject: &dyn Subject) -> Value {
        (self.func)(subject)
    }

    /// Number for `subject`, `0` unless this is a number producer
    pub fn number(&self, subject: &dyn Subject) -> f64 {
        self.value(subject).as_number().unwrap_or(0.0)
    }

    /// Display string for `subject`
    pub fn string(&self, subject: &dyn Subject) -> String {
        self.value(subject).to_string()
    }

    /// Fail unless this producer yields `expected`
    pub fn expect_kind(self, reference: &str, expected: ValueKind) -> HudResult<Self> {
        if self.kind == expected {
            Ok(self)
        } else {
            Err(HudError::UnexpectedKind {
                name: reference.to_string(),
                expected,
            })
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("kind", &self.kind).finish()
    }
}

type Factory = dyn Fn(&[String]) -> HudResult<Producer> + Send + Sync;

struct Entry {
    arity: usize,
    factory: Arc<Factory>,
}

/// Registry of placeholder factories
pub struct PlaceholderRegistry {
    entries: HashMap<String, Entry>,
}

impl PlaceholderRegistry {
    /// Registry without any placeholder
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry with the attribute readers every host supports
    ///
    /// * `tick` - subject tick counter
    /// * `name` - subject name
    /// * `number:<attr>` - numeric attribute, `0` when missing
    /// * `string:<attr>` - attribute as text, `<none>` when missing
    /// * `boolean:<attr>` - boolean attribute, `false` when missing
    #[allow(clippy::cast_precision_loss)]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_value("tick", ValueKind::Number, |s| Value::Number(s.tick() as f64));
        registry.register_value("name", ValueKind::String, |s| s.name().into());
        registry.register("number", 1, |args| {
            let key = args[0].clone();
            Ok(Producer::new(ValueKind::Number, move |s| {
                Value::Number(s.attribute(&key).and_then(Value::as_number).unwrap_or(0.0))
            }))
        });
        registry.register("string", 1, |args| {
            let key = args[0].clone();
            Ok(Producer::new(ValueKind::String, move |s| {
                s.attribute(&key).map_or_else(
                    || Value::fallback(ValueKind::String),
                    |v| Value::String(v.to_string()),
                )
            }))
        });
        registry.register("boolean", 1, |args| {
            let key = args[0].clone();
            Ok(Producer::new(ValueKind::Boolean, move |s| {
                Value::Boolean(s.attribute(&key).and_then(Value::as_bool).unwrap_or(false))
            }))
        });
        registry
    }

    /// Register a factory taking exactly `arity` arguments
    pub fn register<F>(&mut self, name: &str, arity: usize, factory: F)
    where
        F: Fn(&[String]) -> HudResult<Producer> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Entry {
                arity,
                factory: Arc::new(factory),
            },
        );
    }

    /// Register an argument-less placeholder
    pub fn register_value<F>(&mut self, name: &str, kind: ValueKind, func: F)
    where
        F: Fn(&dyn Subject) -> Value + Send + Sync + 'static,
    {
        let producer = Producer::new(kind, func);
        self.register(name, 0, move |_| Ok(producer.clone()));
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up a placeholder by name with arguments
    pub fn lookup(&self, name: &str, args: &[String]) -> HudResult<Producer> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| HudError::UnknownPlaceholder(name.to_string()))?;
        if entry.arity != args.len() {
            return Err(HudError::ArityMismatch {
                name: name.to_string(),
                expected: entry.arity,
                actual: args.len(),
            });
        }
        (entry.factory)(args)
    }

    /// Resolve a reference as written in a definition
    ///
    /// Accepts literals (`12.5`, `'text'`, `true`) and placeholder references
    /// (`name` or `name:arg1,arg2`), optionally wrapped in `[...]`.
    pub fn find(&self, reference: &str) -> HudResult<Producer> {
        let trimmed = reference.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .unwrap_or(trimmed)
            .trim();
        if let Some(literal) = parse_literal(inner) {
            return Ok(Producer::constant(literal));
        }
        let (name, args) = split_reference(inner);
        self.lookup(name, &args)
    }
}

impl Default for PlaceholderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Split `name:a,b` into name and arguments
pub(crate) fn split_reference(reference: &str) -> (&str, Vec<String>) {
    match reference.split_once(':') {
        Some((name, args)) => (
            name.trim(),
            args.split(',').map(|a| a.trim().to_string()).collect(),
        ),
        None => (reference, Vec::new()),
    }
}

fn parse_literal(text: &str) -> Option<Value> {
    if let Some(quoted) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Some(Value::String(quoted.to_string()));
    }
    match text {
        "true" => Some(Value::Boolean(true)),
        "false" => Some(Value::Boolean(false)),
        _ => text.parse::<f64>().ok().filter(|n| n.is_finite()).map(Value::Number),
    }
}
