//! Follow redirection and visibility gates
//!
//! An element may render for another subject named by a string placeholder.
//! The redirect is resolved first; the element's conditions are then checked
//! against whichever subject it ended up with.

use crate::definition::{ConditionRule, ElementDef};
use crate::error::HudResult;
use crate::placeholder::{ConditionBuilder, PlaceholderRegistry, Producer, ValueKind};
use crate::subject::{Subject, SubjectDirectory};

/// Result of resolving a follow redirect
pub enum FollowOutcome<'a> {
    /// Render for the original subject
    Keep,
    /// Render for another subject
    Switch(&'a dyn Subject),
    /// Render nothing
    Cancel,
}

/// A compiled follow redirect
#[derive(Debug, Clone)]
pub struct Follow {
    target: Producer,
    cancel_if_missing: bool,
}

impl Follow {
    /// Compile a redirect; `reference` must be a string placeholder
    pub fn compile(
        reference: &str,
        cancel_if_missing: bool,
        registry: &PlaceholderRegistry,
    ) -> HudResult<Self> {
        Ok(Self {
            target: registry.find(reference)?.expect_kind(reference, ValueKind::String)?,
            cancel_if_missing,
        })
    }

    /// Resolve the redirect for `subject`
    pub fn resolve<'a>(
        &self,
        directory: &'a dyn SubjectDirectory,
        subject: &dyn Subject,
    ) -> FollowOutcome<'a> {
        let name = self.target.string(subject);
        match directory.find(&name) {
            Some(found) => FollowOutcome::Switch(found),
            None if self.cancel_if_missing => FollowOutcome::Cancel,
            None => FollowOutcome::Keep,
        }
    }
}

/// Follow redirect plus condition of one element
#[derive(Debug, Clone, Default)]
pub struct ElementGate {
    follow: Option<Follow>,
    condition: ConditionBuilder,
}

impl ElementGate {
    /// Gate built from the element's own fields and its resource's conditions
    pub fn compile(
        element: &ElementDef,
        resource_conditions: &[ConditionRule],
        registry: &PlaceholderRegistry,
    ) -> HudResult<Self> {
        let follow = element
            .follow
            .as_deref()
            .map(|reference| {
                Follow::compile(reference, element.cancel_if_follower_not_exists, registry)
            })
            .transpose()?;
        let condition = ConditionBuilder::parse(&element.conditions, registry)?
            .and(ConditionBuilder::parse(resource_conditions, registry)?);
        Ok(Self { follow, condition })
    }

    /// Subject to render for, `None` when the element renders nothing
    pub fn resolve<'a>(
        &self,
        directory: &'a dyn SubjectDirectory,
        subject: &'a dyn Subject,
    ) -> Option<&'a dyn Subject> {
        let target = match &self.follow {
            None => subject,
            Some(follow) => match follow.resolve(directory, subject) {
                FollowOutcome::Keep => subject,
                FollowOutcome::Switch(other) => other,
                FollowOutcome::Cancel => return None,
            },
        };
        self.condition.evaluate(target).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{NoSubjects, SubjectMap, SubjectState};

    fn element(follow: &str, cancel: bool) -> ElementDef {
        ElementDef {
            follow: Some(follow.to_string()),
            cancel_if_follower_not_exists: cancel,
            conditions: vec![ConditionRule::new("number:health", ">", "0")],
            ..ElementDef::default()
        }
    }

    #[test]
    fn test_follow_switches_subject_before_condition() {
        let registry = PlaceholderRegistry::with_builtins();
        let gate = ElementGate::compile(&element("string:target", true), &[], &registry).unwrap();
        let mut directory = SubjectMap::new();
        directory.insert(SubjectState::new("steve").with_attribute("health", 5.0));
        let viewer = SubjectState::new("alex").with_attribute("target", "steve");
        let resolved = gate.resolve(&directory, &viewer).unwrap();
        assert_eq!(resolved.name(), "steve");
    }

    #[test]
    fn test_missing_follower() {
        let registry = PlaceholderRegistry::with_builtins();
        let viewer = SubjectState::new("alex")
            .with_attribute("target", "nobody")
            .with_attribute("health", 5.0);

        let cancel = ElementGate::compile(&element("string:target", true), &[], &registry).unwrap();
        assert!(cancel.resolve(&NoSubjects, &viewer).is_none());

        let keep = ElementGate::compile(&element("string:target", false), &[], &registry).unwrap();
        assert_eq!(keep.resolve(&NoSubjects, &viewer).unwrap().name(), "alex");
    }

    #[test]
    fn test_resource_conditions_are_combined() {
        let registry = PlaceholderRegistry::with_builtins();
        let gate = ElementGate::compile(
            &ElementDef::default(),
            &[ConditionRule::new("name", "==", "'alex'")],
            &registry,
        )
        .unwrap();
        assert!(gate.resolve(&NoSubjects, &SubjectState::new("alex")).is_some());
        assert!(gate.resolve(&NoSubjects, &SubjectState::new("steve")).is_none());
    }

    #[test]
    fn test_follow_must_be_a_string() {
        let registry = PlaceholderRegistry::with_builtins();
        assert!(ElementGate::compile(&element("tick", true), &[], &registry).is_err());
    }
}
