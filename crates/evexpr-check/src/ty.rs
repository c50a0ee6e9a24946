//! Semantic types of expressions and parameter kind families.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The type an expression resolves to, or is expected to have.
///
/// Not a lattice: only `NumberOrString` is compatible with more than one
/// other type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Number,
    String,
    #[serde(rename = "number|string")]
    NumberOrString,
    Variable,
    Object,
    Boolean,
    /// Unresolved. As an expectation, accepts anything.
    Unknown,
    /// No value is expected.
    Empty,
}

impl SemanticType {
    /// Map a metadata type string (a return type or a parameter kind).
    pub fn from_metadata_type(kind: &str) -> Self {
        match kind {
            "number|string" => SemanticType::NumberOrString,
            "boolean" | "yesorno" | "trueorfalse" => SemanticType::Boolean,
            _ => match ParameterFamily::classify(kind) {
                Some(ParameterFamily::Number) => SemanticType::Number,
                Some(ParameterFamily::String) => SemanticType::String,
                Some(ParameterFamily::Variable) => SemanticType::Variable,
                Some(ParameterFamily::Object) => SemanticType::Object,
                Some(ParameterFamily::Behavior) | None => SemanticType::Unknown,
            },
        }
    }

    /// Whether a value of type `self` can be used where `expected` is
    /// required. Unresolved types never cause a second error.
    pub fn is_compatible_with(self, expected: SemanticType) -> bool {
        use SemanticType::*;
        match (self, expected) {
            (_, Unknown) | (Unknown, _) => true,
            (Number | String, NumberOrString) | (NumberOrString, Number | String) => true,
            (found, expected) => found == expected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Number => "number",
            SemanticType::String => "string",
            SemanticType::NumberOrString => "number|string",
            SemanticType::Variable => "variable",
            SemanticType::Object => "object",
            SemanticType::Boolean => "boolean",
            SemanticType::Unknown => "unknown",
            SemanticType::Empty => "empty",
        }
    }

    /// Types that hold a number or text value.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            SemanticType::Number | SemanticType::String | SemanticType::NumberOrString
        )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s {
            "number" => SemanticType::Number,
            "string" => SemanticType::String,
            "number|string" => SemanticType::NumberOrString,
            "variable" => SemanticType::Variable,
            "object" => SemanticType::Object,
            "boolean" => SemanticType::Boolean,
            "unknown" => SemanticType::Unknown,
            "empty" => SemanticType::Empty,
            other => {
                return Err(format!(
                    "unknown type `{other}` (expected number, string, number|string, variable, object, boolean, unknown or empty)"
                ))
            }
        };
        Ok(ty)
    }
}

/// Groups of parameter kinds checked the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterFamily {
    Number,
    String,
    Variable,
    Object,
    Behavior,
}

impl ParameterFamily {
    /// `None` for kinds this validator does not know about.
    pub fn classify(kind: &str) -> Option<Self> {
        let family = match kind {
            "number" | "expression" | "camera" | "forceMultiplier" => ParameterFamily::Number,
            "string" | "layer" | "color" | "file" | "joyaxis" | "stringWithSelector"
            | "sceneName" | "layerEffectName" | "layerEffectParameterName"
            | "objectEffectName" | "objectPointName" | "objectAnimationName"
            | "functionParameterName" | "externalLayoutName" | "leaderboardId"
            | "identifier" | "key" | "mouse" | "password" | "musicfile" | "soundfile"
            | "police" => ParameterFamily::String,
            "variable" | "scenevar" | "globalvar" | "objectvar" => ParameterFamily::Variable,
            "object" | "objectPtr" | "objectList" | "objectListOrEmptyIfJustDeclared"
            | "objectListOrEmptyWithoutPicking" => ParameterFamily::Object,
            "behavior" => ParameterFamily::Behavior,
            _ => return None,
        };
        Some(family)
    }

    /// The type an argument of this family is validated against.
    pub fn expected_type(self) -> SemanticType {
        match self {
            ParameterFamily::Number => SemanticType::Number,
            ParameterFamily::String => SemanticType::String,
            ParameterFamily::Variable => SemanticType::Variable,
            ParameterFamily::Object => SemanticType::Object,
            ParameterFamily::Behavior => SemanticType::Unknown,
        }
    }
}
