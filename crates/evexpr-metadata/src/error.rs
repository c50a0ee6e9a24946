//! Errors raised while loading metadata catalogs.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a catalog. Lookups themselves never fail.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("cannot read metadata catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata catalog {origin}: {source}")]
    Json {
        /// File path, or `<inline>` for catalogs parsed from a string.
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}
