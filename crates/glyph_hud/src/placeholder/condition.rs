//! Condition engine
//!
//! Rules compare two producers of the same kind and are folded left to right
//! with `and` / `or` gates. The comparison operator is resolved at compile
//! time; evaluation only reads producer values.

use std::sync::Arc;

use super::registry::{PlaceholderRegistry, Producer};
use super::value::{Value, ValueKind};
use crate::definition::ConditionRule;
use crate::error::{HudError, HudResult};
use crate::subject::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringOp {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BooleanOp {
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Number(NumberOp),
    String(StringOp),
    Boolean(BooleanOp),
}

impl Operation {
    fn resolve(kind: ValueKind, operation: &str) -> HudResult<Self> {
        let op = match kind {
            ValueKind::Number => match operation {
                ">" => Some(Self::Number(NumberOp::Greater)),
                ">=" => Some(Self::Number(NumberOp::GreaterOrEqual)),
                "<" => Some(Self::Number(NumberOp::Less)),
                "<=" => Some(Self::Number(NumberOp::LessOrEqual)),
                "==" => Some(Self::Number(NumberOp::Equal)),
                "!=" => Some(Self::Number(NumberOp::NotEqual)),
                _ => None,
            },
            ValueKind::String => match operation {
                "==" => Some(Self::String(StringOp::Equal)),
                "!=" => Some(Self::String(StringOp::NotEqual)),
                "contains" => Some(Self::String(StringOp::Contains)),
                "!contains" => Some(Self::String(StringOp::NotContains)),
                "starts-with" => Some(Self::String(StringOp::StartsWith)),
                "ends-with" => Some(Self::String(StringOp::EndsWith)),
                _ => None,
            },
            ValueKind::Boolean => match operation {
                "==" => Some(Self::Boolean(BooleanOp::Equal)),
                "!=" => Some(Self::Boolean(BooleanOp::NotEqual)),
                _ => None,
            },
        };
        op.ok_or_else(|| HudError::UnsupportedOperation {
            kind,
            operation: operation.to_string(),
        })
    }

    #[allow(clippy::float_cmp)]
    fn apply(self, first: &Value, second: &Value) -> bool {
        match (self, first, second) {
            (Self::Number(op), Value::Number(a), Value::Number(b)) => match op {
                NumberOp::Greater => a > b,
                NumberOp::GreaterOrEqual => a >= b,
                NumberOp::Less => a < b,
                NumberOp::LessOrEqual => a <= b,
                NumberOp::Equal => a == b,
                NumberOp::NotEqual => a != b,
            },
            (Self::String(op), Value::String(a), Value::String(b)) => match op {
                StringOp::Equal => a == b,
                StringOp::NotEqual => a != b,
                StringOp::Contains => a.contains(b.as_str()),
                StringOp::NotContains => !a.contains(b.as_str()),
                StringOp::StartsWith => a.starts_with(b.as_str()),
                StringOp::EndsWith => a.ends_with(b.as_str()),
            },
            (Self::Boolean(op), Value::Boolean(a), Value::Boolean(b)) => match op {
                BooleanOp::Equal => a == b,
                BooleanOp::NotEqual => a != b,
            },
            _ => false,
        }
    }
}

/// One kind-checked comparison
#[derive(Debug)]
pub struct Comparison {
    first: Producer,
    second: Producer,
    operation: Operation,
}

impl Comparison {
    fn evaluate(&self, subject: &dyn Subject) -> bool {
        self.operation
            .apply(&self.first.value(subject), &self.second.value(subject))
    }
}

/// Compiled predicate tree
#[derive(Debug, Clone, Default)]
pub enum ConditionBuilder {
    /// No rules
    #[default]
    AlwaysTrue,
    /// Single comparison
    Compare(Arc<Comparison>),
    /// Both sides must hold, right side skipped when the left fails
    And(Box<Self>, Box<Self>),
    /// Either side, right side skipped when the left holds
    Or(Box<Self>, Box<Self>),
}

impl ConditionBuilder {
    /// Compile rules in declaration order
    pub fn parse(rules: &[ConditionRule], registry: &PlaceholderRegistry) -> HudResult<Self> {
        rules.iter().try_fold(Self::AlwaysTrue, |acc, rule| {
            let next = Self::compile_rule(rule, registry)?;
            match rule.gate.as_deref().unwrap_or("and") {
                "and" => Ok(acc.and(next)),
                "or" => Ok(acc.or(next)),
                other => Err(HudError::UnknownGate(other.to_string())),
            }
        })
    }

    fn compile_rule(rule: &ConditionRule, registry: &PlaceholderRegistry) -> HudResult<Self> {
        let first = registry.find(&rule.first)?;
        let second = registry.find(&rule.second)?;
        if first.kind() != second.kind() {
            return Err(HudError::KindMismatch {
                first: first.kind(),
                second: second.kind(),
            });
        }
        let operation = Operation::resolve(first.kind(), rule.operation.trim())?;
        Ok(Self::Compare(Arc::new(Comparison {
            first,
            second,
            operation,
        })))
    }

    /// Conjunction; `AlwaysTrue` is the identity
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::AlwaysTrue, other) | (other, Self::AlwaysTrue) => other,
            (a, b) => Self::And(Box::new(a), Box::new(b)),
        }
    }

    /// Disjunction; `AlwaysTrue` on either side absorbs the other
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::AlwaysTrue, _) | (_, Self::AlwaysTrue) => Self::AlwaysTrue,
            (a, b) => Self::Or(Box::new(a), Box::new(b)),
        }
    }

    /// Whether the predicate holds for `subject`
    pub fn evaluate(&self, subject: &dyn Subject) -> bool {
        match self {
            Self::AlwaysTrue => true,
            Self::Compare(cmp) => cmp.evaluate(subject),
            Self::And(a, b) => a.evaluate(subject) && b.evaluate(subject),
            Self::Or(a, b) => a.evaluate(subject) || b.evaluate(subject),
        }
    }

    /// Whether this predicate has no rules
    pub const fn is_always_true(&self) -> bool {
        matches!(self, Self::AlwaysTrue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::SubjectState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> PlaceholderRegistry {
        PlaceholderRegistry::with_builtins()
    }

    #[test]
    fn test_no_rules_is_always_true() {
        let cond = ConditionBuilder::parse(&[], &registry()).unwrap();
        assert!(cond.is_always_true());
        assert!(cond.evaluate(&SubjectState::new("alex")));
    }

    #[test]
    fn test_number_comparisons() {
        let rules = [ConditionRule::new("number:health", ">=", "10")];
        let cond = ConditionBuilder::parse(&rules, &registry()).unwrap();
        assert!(cond.evaluate(&SubjectState::new("a").with_attribute("health", 10.0)));
        assert!(!cond.evaluate(&SubjectState::new("a").with_attribute("health", 9.5)));
    }

    #[test]
    fn test_string_operations() {
        let reg = registry();
        let subject = SubjectState::new("alexander");
        for (op, other, expected) in [
            ("==", "'alexander'", true),
            ("!=", "'alexander'", false),
            ("contains", "'xan'", true),
            ("!contains", "'xan'", false),
            ("starts-with", "'alex'", true),
            ("ends-with", "'alex'", false),
        ] {
            let cond = ConditionBuilder::parse(&[ConditionRule::new("name", op, other)], &reg)
                .unwrap();
            assert_eq!(cond.evaluate(&subject), expected, "operation {op}");
        }
    }

    #[test]
    fn test_gates_fold_left_to_right() {
        let rules = [
            ConditionRule::new("number:health", "<", "5"),
            ConditionRule::new("boolean:flying", "==", "true").with_gate("or"),
            ConditionRule::new("name", "==", "'alex'"),
        ];
        let cond = ConditionBuilder::parse(&rules, &registry()).unwrap();
        let flying = SubjectState::new("alex")
            .with_attribute("health", 20.0)
            .with_attribute("flying", true);
        assert!(cond.evaluate(&flying));
        let other = SubjectState::new("steve").with_attribute("health", 1.0);
        assert!(!cond.evaluate(&other));
    }

    #[test]
    fn test_leading_or_keeps_empty_predicate_true() {
        let rules = [ConditionRule::new("number:health", ">", "100").with_gate("or")];
        let cond = ConditionBuilder::parse(&rules, &registry()).unwrap();
        assert!(cond.evaluate(&SubjectState::new("alex").with_attribute("health", 5.0)));

        let rules = [
            ConditionRule::new("number:health", ">", "100").with_gate("or"),
            ConditionRule::new("number:health", "<", "10"),
        ];
        let cond = ConditionBuilder::parse(&rules, &registry()).unwrap();
        assert!(cond.evaluate(&SubjectState::new("alex").with_attribute("health", 5.0)));
        assert!(!cond.evaluate(&SubjectState::new("alex").with_attribute("health", 50.0)));
    }

    #[test]
    fn test_number_equality_is_exact() {
        let rules = [ConditionRule::new("number:score", "==", "1000000000")];
        let cond = ConditionBuilder::parse(&rules, &registry()).unwrap();
        assert!(cond.evaluate(&SubjectState::new("a").with_attribute("score", 1e9)));
        assert!(!cond.evaluate(&SubjectState::new("a").with_attribute("score", 1e9 + 0.5)));
        let rules = [ConditionRule::new("number:score", "!=", "0.3")];
        let cond = ConditionBuilder::parse(&rules, &registry()).unwrap();
        assert!(cond.evaluate(&SubjectState::new("a").with_attribute("score", 0.1 + 0.2)));
    }

    #[test]
    fn test_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut reg = registry();
        reg.register_value("counted", ValueKind::Boolean, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Value::Boolean(true)
        });
        let rules = [
            ConditionRule::new("false", "==", "true"),
            ConditionRule::new("counted", "==", "true"),
        ];
        let cond = ConditionBuilder::parse(&rules, &reg).unwrap();
        assert!(!cond.evaluate(&SubjectState::new("alex")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_compile_failures() {
        let reg = registry();
        assert!(matches!(
            ConditionBuilder::parse(&[ConditionRule::new("number:health", "==", "name")], &reg),
            Err(HudError::KindMismatch {
                first: ValueKind::Number,
                second: ValueKind::String
            })
        ));
        assert!(matches!(
            ConditionBuilder::parse(&[ConditionRule::new("name", ">", "'a'")], &reg),
            Err(HudError::UnsupportedOperation { kind: ValueKind::String, .. })
        ));
        assert!(matches!(
            ConditionBuilder::parse(&[ConditionRule::new("tick", ">", "0").with_gate("xor")], &reg),
            Err(HudError::UnknownGate(gate)) if gate == "xor"
        ));
        assert!(matches!(
            ConditionBuilder::parse(&[ConditionRule::new("mana", ">", "0")], &reg),
            Err(HudError::UnknownPlaceholder(_))
        ));
    }
}
