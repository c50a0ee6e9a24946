//! The `evexpr.toml` project manifest.
//!
//! ```toml
//! metadata = ["extensions/inventory.json"]
//! builtins = true
//!
//! [global.objects.Hud]
//! type = "TextInput::TextInputObject"
//!
//! [scene.objects.Player]
//! type = "Sprite"
//! behaviors = { Platformer = "PlatformBehavior::PlatformerObjectBehavior" }
//! variables = ["Lives"]
//!
//! [scene.groups]
//! Characters = ["Player"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use evexpr_metadata::{ObjectsContainer, ObjectsScope};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A parsed `evexpr.toml`.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// JSON catalogs, relative to the manifest directory.
    #[serde(default)]
    pub metadata: Vec<PathBuf>,
    /// Whether the built-in extensions are registered.
    #[serde(default = "default_builtins")]
    pub builtins: bool,
    /// Project-wide objects.
    #[serde(default)]
    pub global: ObjectsContainer,
    /// Objects of the scene the expressions belong to.
    #[serde(default)]
    pub scene: ObjectsContainer,
}

fn default_builtins() -> bool {
    true
}

impl Manifest {
    /// Read and parse a manifest from a file path.
    pub fn from_file(path: &Path) -> Result<Manifest, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ManifestError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a manifest from a string.
    pub fn parse(content: &str) -> Result<Manifest, toml::de::Error> {
        toml::from_str(content)
    }

    /// Catalog paths resolved against the manifest directory.
    pub fn metadata_paths(&self, manifest_dir: &Path) -> Vec<PathBuf> {
        self.metadata.iter().map(|p| manifest_dir.join(p)).collect()
    }

    pub fn objects_scope(&self) -> ObjectsScope {
        ObjectsScope::new(self.global.clone(), self.scene.clone())
    }
}
