//! The extension catalog and its lookup indices.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::builtins;
use crate::error::MetadataError;
use crate::metadata::{ExpressionMetadata, Extension, ObjectMetadata};
use crate::{MetadataProvider, BASE_OBJECT_TYPE};

/// JSON catalog: either a single extension or `{ "extensions": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Catalog {
    Many { extensions: Vec<Extension> },
    One(Extension),
}

/// All registered extensions, indexed for lookup by name.
///
/// Built once, then shared read-only between any number of validations.
#[derive(Debug, Default)]
pub struct Platform {
    extensions: Vec<String>,
    free_functions: FxHashMap<String, ExpressionMetadata>,
    /// Object type -> function name -> metadata. Base object functions are
    /// registered under [`BASE_OBJECT_TYPE`].
    object_functions: FxHashMap<String, FxHashMap<String, ExpressionMetadata>>,
    behavior_functions: FxHashMap<String, FxHashMap<String, ExpressionMetadata>>,
    objects: FxHashMap<String, ObjectMetadata>,
}

impl Platform {
    /// An empty platform with no extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform with the built-in extensions registered.
    pub fn with_builtins() -> Self {
        let mut platform = Self::new();
        for extension in builtins::extensions() {
            platform.add_extension(extension);
        }
        platform
    }

    /// Parse a JSON catalog and register its extensions.
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        let mut platform = Self::new();
        platform.load_json_str(json, "<inline>")?;
        Ok(platform)
    }

    /// Read a JSON catalog from disk and register its extensions on top of
    /// the ones already there.
    pub fn load(&mut self, path: &Path) -> Result<(), MetadataError> {
        let json = fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_json_str(&json, &path.display().to_string())
    }

    fn load_json_str(&mut self, json: &str, origin: &str) -> Result<(), MetadataError> {
        let catalog: Catalog = serde_json::from_str(json).map_err(|source| MetadataError::Json {
            origin: origin.to_string(),
            source,
        })?;
        let extensions = match catalog {
            Catalog::Many { extensions } => extensions,
            Catalog::One(extension) => vec![extension],
        };
        debug!(origin, count = extensions.len(), "loading metadata catalog");
        for extension in extensions {
            self.add_extension(extension);
        }
        Ok(())
    }

    /// Register an extension. A name registered twice keeps the latest
    /// definition.
    pub fn add_extension(&mut self, extension: Extension) {
        debug!(
            extension = %extension.name,
            expressions = extension.expressions.len(),
            objects = extension.objects.len(),
            behaviors = extension.behaviors.len(),
            "registering extension"
        );

        for expression in extension.expressions {
            insert_function(&mut self.free_functions, &extension.name, "", expression);
        }

        for mut object in extension.objects {
            let functions = self
                .object_functions
                .entry(object.type_name.clone())
                .or_default();
            for expression in std::mem::take(&mut object.expressions) {
                insert_function(functions, &extension.name, &object.type_name, expression);
            }
            if object.type_name != BASE_OBJECT_TYPE
                || !object.unsupported_base_object_capabilities.is_empty()
            {
                if self.objects.contains_key(&object.type_name) {
                    warn!(
                        extension = %extension.name,
                        object = %object.type_name,
                        "object type registered twice, keeping the latest"
                    );
                }
                self.objects.insert(object.type_name.clone(), object);
            }
        }

        for behavior in extension.behaviors {
            let functions = self
                .behavior_functions
                .entry(behavior.type_name.clone())
                .or_default();
            for expression in behavior.expressions {
                insert_function(functions, &extension.name, &behavior.type_name, expression);
            }
        }

        self.extensions.push(extension.name);
    }

    /// Names of the registered extensions, in registration order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Number of registered expressions, all shapes included.
    pub fn expression_count(&self) -> usize {
        self.free_functions.len()
            + self.object_functions.values().map(FxHashMap::len).sum::<usize>()
            + self.behavior_functions.values().map(FxHashMap::len).sum::<usize>()
    }
}

fn insert_function(
    functions: &mut FxHashMap<String, ExpressionMetadata>,
    extension: &str,
    owner: &str,
    expression: ExpressionMetadata,
) {
    if functions.contains_key(&expression.name) {
        warn!(
            extension,
            owner,
            name = %expression.name,
            "expression registered twice, keeping the latest"
        );
    }
    functions.insert(expression.name.clone(), expression);
}

impl MetadataProvider for Platform {
    fn free_function(&self, name: &str) -> Option<&ExpressionMetadata> {
        self.free_functions.get(name)
    }

    fn object_function(&self, object_type: &str, name: &str) -> Option<&ExpressionMetadata> {
        self.object_functions
            .get(object_type)
            .and_then(|functions| functions.get(name))
            .or_else(|| {
                self.object_functions
                    .get(BASE_OBJECT_TYPE)
                    .and_then(|functions| functions.get(name))
            })
    }

    fn behavior_function(&self, behavior_type: &str, name: &str) -> Option<&ExpressionMetadata> {
        self.behavior_functions
            .get(behavior_type)
            .and_then(|functions| functions.get(name))
    }

    fn object_metadata(&self, object_type: &str) -> Option<&ObjectMetadata> {
        self.objects.get(object_type)
    }
}
