//! Object declarations of a project and of the scene being edited.
//!
//! Expressions name objects (`Player.X()`), never object types. These
//! containers answer which type and behaviors a name stands for.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One declared object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDeclaration {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Behavior name -> behavior type.
    #[serde(default)]
    pub behaviors: FxHashMap<String, String>,
    /// Declared object variables. `None` when the object does not list
    /// them, in which case any variable name is accepted.
    #[serde(default)]
    pub variables: Option<Vec<String>>,
}

impl ObjectDeclaration {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_behavior(mut self, name: impl Into<String>, behavior_type: impl Into<String>) -> Self {
        self.behaviors.insert(name.into(), behavior_type.into());
        self
    }

    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }
}

/// Objects and object groups declared at one level (project or scene).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectsContainer {
    #[serde(default)]
    pub objects: FxHashMap<String, ObjectDeclaration>,
    /// Group name -> member object names.
    #[serde(default)]
    pub groups: FxHashMap<String, Vec<String>>,
}

impl ObjectsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, name: impl Into<String>, declaration: ObjectDeclaration) -> Self {
        self.objects.insert(name.into(), declaration);
        self
    }

    pub fn with_group<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }
}

/// Global (project) and local (scene) declarations. Local names shadow
/// global ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectsScope {
    pub global: ObjectsContainer,
    pub local: ObjectsContainer,
}

impl ObjectsScope {
    pub fn new(global: ObjectsContainer, local: ObjectsContainer) -> Self {
        Self { global, local }
    }

    fn object(&self, name: &str) -> Option<&ObjectDeclaration> {
        self.local
            .objects
            .get(name)
            .or_else(|| self.global.objects.get(name))
    }

    fn group(&self, name: &str) -> Option<&[String]> {
        self.local
            .groups
            .get(name)
            .or_else(|| self.global.groups.get(name))
            .map(Vec::as_slice)
    }

    /// Declared type of an object, or of a group whose members all share
    /// one type. `None` for unknown names and mixed (or empty) groups.
    pub fn object_type(&self, name: &str) -> Option<&str> {
        if let Some(object) = self.object(name) {
            return Some(object.type_name.as_str());
        }
        self.common_to_members(name, |member| Some(member.type_name.as_str()))
    }

    /// Type of the behavior called `behavior` on an object, or on every
    /// member of a group.
    pub fn behavior_type(&self, object: &str, behavior: &str) -> Option<&str> {
        if let Some(declaration) = self.object(object) {
            return declaration.behaviors.get(behavior).map(String::as_str);
        }
        self.common_to_members(object, |member| {
            member.behaviors.get(behavior).map(String::as_str)
        })
    }

    /// Declared variables of an object. Groups never list variables.
    pub fn object_variables(&self, object: &str) -> Option<&[String]> {
        self.object(object)?.variables.as_deref()
    }

    fn common_to_members<'a>(
        &'a self,
        group: &str,
        property: impl Fn(&'a ObjectDeclaration) -> Option<&'a str>,
    ) -> Option<&'a str> {
        let mut common = None;
        for member in self.group(group)? {
            let value = property(self.object(member)?)?;
            match common {
                None => common = Some(value),
                Some(seen) if seen == value => {}
                Some(_) => return None,
            }
        }
        common
    }
}
