//! Subjects a display is rendered for
//!
//! The host owns the live state of whoever is looking at the HUD. The engine
//! only reads it through these traits, once per subject per tick.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::component::TextColor;
use crate::placeholder::Value;

/// Read-only view of one subject's live state
pub trait Subject: Send + Sync {
    /// Unique name, used by follow redirection
    fn name(&self) -> &str;

    /// Monotonic tick counter
    fn tick(&self) -> u64;

    /// Live attribute by key
    fn attribute(&self, key: &str) -> Option<&Value>;
}

/// Lookup of other live subjects by name
pub trait SubjectDirectory: Send + Sync {
    /// Subject called `name`, if it currently exists
    fn find(&self, name: &str) -> Option<&dyn Subject>;
}

/// Directory that never finds anyone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubjects;

impl SubjectDirectory for NoSubjects {
    fn find(&self, _name: &str) -> Option<&dyn Subject> {
        None
    }
}

/// Plain in-memory subject
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectState {
    name: String,
    tick: u64,
    attributes: HashMap<String, Value>,
}

impl SubjectState {
    /// Subject at tick 0 without attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tick: 0,
            attributes: HashMap::new(),
        }
    }

    /// Builder-style tick setter
    #[must_use]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    /// Builder-style attribute setter
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Replace an attribute
    pub fn set_attribute(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Advance to `tick`
    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }
}

impl Subject for SubjectState {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&self) -> u64 {
        self.tick
    }

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// In-memory directory keyed by subject name
#[derive(Debug, Clone, Default)]
pub struct SubjectMap {
    subjects: IndexMap<String, SubjectState>,
}

impl SubjectMap {
    /// Empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a subject
    pub fn insert(&mut self, subject: SubjectState) {
        self.subjects.insert(subject.name.clone(), subject);
    }

    /// Remove a subject
    pub fn remove(&mut self, name: &str) -> Option<SubjectState> {
        self.subjects.shift_remove(name)
    }

    /// Subject by name
    pub fn get(&self, name: &str) -> Option<&SubjectState> {
        self.subjects.get(name)
    }

    /// Mutable subject by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SubjectState> {
        self.subjects.get_mut(name)
    }

    /// All subjects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SubjectState> {
        self.subjects.values()
    }
}

impl SubjectDirectory for SubjectMap {
    fn find(&self, name: &str) -> Option<&dyn Subject> {
        self.subjects.get(name).map(|s| s as &dyn Subject)
    }
}

/// Side length of a head portrait in skin pixels
pub const HEAD_SIZE: usize = 8;

/// Face colours plus an optional hair layer, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadSkin {
    /// Face layer, always opaque
    pub face: [[TextColor; HEAD_SIZE]; HEAD_SIZE],
    /// Hair layer, `None` pixels are transparent
    pub hair: Option<[[Option<TextColor>; HEAD_SIZE]; HEAD_SIZE]>,
}

impl HeadSkin {
    /// Single-colour face without hair
    pub fn solid(color: TextColor) -> Self {
        Self {
            face: [[color; HEAD_SIZE]; HEAD_SIZE],
            hair: None,
        }
    }
}

/// Source of head skins
pub trait SkinProvider: Send + Sync {
    /// Skin of `subject`, `None` when it has none
    fn skin(&self, subject: &dyn Subject) -> Option<HeadSkin>;
}

/// Provider that never has a skin
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSkins;

impl SkinProvider for NoSkins {
    fn skin(&self, _subject: &dyn Subject) -> Option<HeadSkin> {
        None
    }
}

/// Reads skins from string attributes of the subject
///
/// The face attribute holds 64 `rrggbb` groups, row-major. The optional hair
/// attribute holds 64 `rrggbbaa` groups; alpha `00` is transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSkinProvider {
    face: String,
    hair: String,
}

impl AttributeSkinProvider {
    /// Provider reading `face` and `hair` attributes
    pub fn new(face: impl Into<String>, hair: impl Into<String>) -> Self {
        Self {
            face: face.into(),
            hair: hair.into(),
        }
    }

    fn decode_face(encoded: &str) -> Option<[[TextColor; HEAD_SIZE]; HEAD_SIZE]> {
        let colors = hex_groups(encoded, 6)?;
        let mut face = [[TextColor::WHITE; HEAD_SIZE]; HEAD_SIZE];
        for (i, rgb) in colors.into_iter().enumerate() {
            face[i / HEAD_SIZE][i % HEAD_SIZE] = TextColor(rgb);
        }
        Some(face)
    }

    fn decode_hair(encoded: &str) -> Option<[[Option<TextColor>; HEAD_SIZE]; HEAD_SIZE]> {
        let colors = hex_groups(encoded, 8)?;
        let mut hair = [[None; HEAD_SIZE]; HEAD_SIZE];
        for (i, rgba) in colors.into_iter().enumerate() {
            if rgba & 0xFF != 0 {
                hair[i / HEAD_SIZE][i % HEAD_SIZE] = Some(TextColor(rgba >> 8));
            }
        }
        Some(hair)
    }
}

impl Default for AttributeSkinProvider {
    fn default() -> Self {
        Self::new("skin", "skin-hair")
    }
}

fn hex_groups(encoded: &str, digits: usize) -> Option<Vec<u32>> {
    let encoded = encoded.trim();
    if !encoded.is_ascii() || encoded.len() != digits * HEAD_SIZE * HEAD_SIZE {
        return None;
    }
    (0..HEAD_SIZE * HEAD_SIZE)
        .map(|i| u32::from_str_radix(&encoded[i * digits..(i + 1) * digits], 16).ok())
        .collect()
}

impl SkinProvider for AttributeSkinProvider {
    fn skin(&self, subject: &dyn Subject) -> Option<HeadSkin> {
        let face = subject
            .attribute(&self.face)
            .and_then(Value::as_str)
            .and_then(Self::decode_face)?;
        let hair = subject
            .attribute(&self.hair)
            .and_then(Value::as_str)
            .and_then(Self::decode_hair);
        Some(HeadSkin { face, hair })
    }
}

/// Host collaborators available while rendering
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Follow lookups
    pub directory: &'a dyn SubjectDirectory,
    /// Head skins
    pub skins: &'a dyn SkinProvider,
}

impl<'a> RenderContext<'a> {
    /// Bundle collaborators
    pub fn new(directory: &'a dyn SubjectDirectory, skins: &'a dyn SkinProvider) -> Self {
        Self { directory, skins }
    }
}

impl RenderContext<'static> {
    /// No other subjects, no skins
    pub fn detached() -> Self {
        Self {
            directory: &NoSubjects,
            skins: &NoSkins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_map_lookup() {
        let mut map = SubjectMap::new();
        map.insert(SubjectState::new("alex").with_attribute("health", 20.0));
        let found = map.find("alex").unwrap();
        assert_eq!(found.name(), "alex");
        assert_eq!(found.attribute("health"), Some(&Value::Number(20.0)));
        assert!(map.find("steve").is_none());
        assert!(map.remove("alex").is_some());
        assert!(map.find("alex").is_none());
    }

    #[test]
    fn test_attribute_skin_decoding() {
        let face = "ff0000".repeat(64);
        let mut hair = "00000000".repeat(63);
        hair.push_str("00ff00ff");
        let subject = SubjectState::new("alex")
            .with_attribute("skin", face.as_str())
            .with_attribute("skin-hair", hair.as_str());
        let skin = AttributeSkinProvider::default().skin(&subject).unwrap();
        assert_eq!(skin.face[3][4], TextColor(0xFF0000));
        let hair = skin.hair.unwrap();
        assert_eq!(hair[0][0], None);
        assert_eq!(hair[7][7], Some(TextColor(0x00FF00)));
    }

    #[test]
    fn test_malformed_skin_is_absent() {
        let subject = SubjectState::new("alex").with_attribute("skin", "nope");
        assert!(AttributeSkinProvider::default().skin(&subject).is_none());
        assert!(NoSkins.skin(&subject).is_none());
    }
}
