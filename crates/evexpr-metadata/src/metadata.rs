//! Metadata records describing expressions, objects and behaviors.
//!
//! These mirror the JSON catalog format, so field names are camelCase on
//! the wire: `returnType`, `codeOnly`, `requiredBaseObjectCapability`.

use serde::{Deserialize, Serialize};

/// One declared parameter of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMetadata {
    /// Parameter kind, e.g. `number`, `objectvar`, `layer`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub optional: bool,
    /// Supplied by code generation and never written by the user.
    #[serde(default)]
    pub code_only: bool,
    #[serde(default)]
    pub description: String,
}

impl ParameterMetadata {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            optional: false,
            code_only: false,
            description: String::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn code_only(mut self) -> Self {
        self.code_only = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Metadata of a single expression (a function returning a value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionMetadata {
    pub name: String,
    /// `number`, `string`, `boolean`, ... as written in the catalog.
    pub return_type: String,
    /// All parameters, including the implicit object and behavior
    /// parameters of object and behavior functions.
    #[serde(default)]
    pub parameters: Vec<ParameterMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_base_object_capability: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl ExpressionMetadata {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
            required_base_object_capability: None,
            description: String::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterMetadata) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn requiring_capability(mut self, capability: impl Into<String>) -> Self {
        self.required_base_object_capability = Some(capability.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// `(min, max)` number of parameters the user has to write, counting
    /// from `first_index`. Code-only parameters are never counted; optional
    /// ones only count toward the maximum.
    pub fn parameter_count_range(&self, first_index: usize) -> (usize, usize) {
        self.parameters
            .iter()
            .skip(first_index)
            .filter(|p| !p.code_only)
            .fold((0, 0), |(min, max), p| {
                (if p.optional { min } else { min + 1 }, max + 1)
            })
    }

    /// Parameters the user writes, in order, from `first_index`.
    pub fn written_parameters(
        &self,
        first_index: usize,
    ) -> impl Iterator<Item = &ParameterMetadata> + '_ {
        self.parameters
            .iter()
            .skip(first_index)
            .filter(|p| !p.code_only)
    }
}

/// Metadata of an object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub expressions: Vec<ExpressionMetadata>,
    /// Base object capabilities (e.g. `effect`) this object type lacks.
    #[serde(default)]
    pub unsupported_base_object_capabilities: Vec<String>,
}

impl ObjectMetadata {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_expression(mut self, expression: ExpressionMetadata) -> Self {
        self.expressions.push(expression);
        self
    }

    pub fn without_capability(mut self, capability: impl Into<String>) -> Self {
        self.unsupported_base_object_capabilities
            .push(capability.into());
        self
    }

    pub fn is_unsupported_capability(&self, capability: &str) -> bool {
        self.unsupported_base_object_capabilities
            .iter()
            .any(|c| c == capability)
    }
}

/// Metadata of a behavior type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorMetadata {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub expressions: Vec<ExpressionMetadata>,
}

impl BehaviorMetadata {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            expressions: Vec::new(),
        }
    }

    pub fn with_expression(mut self, expression: ExpressionMetadata) -> Self {
        self.expressions.push(expression);
        self
    }
}

/// A named bundle of free expressions, objects and behaviors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub name: String,
    #[serde(default)]
    pub expressions: Vec<ExpressionMetadata>,
    #[serde(default)]
    pub objects: Vec<ObjectMetadata>,
    #[serde(default)]
    pub behaviors: Vec<BehaviorMetadata>,
}

impl Extension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_expression(mut self, expression: ExpressionMetadata) -> Self {
        self.expressions.push(expression);
        self
    }

    pub fn with_object(mut self, object: ObjectMetadata) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorMetadata) -> Self {
        self.behaviors.push(behavior);
        self
    }
}
