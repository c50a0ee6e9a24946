//! Expression metadata registry and object declarations.
//!
//! The validator never hardcodes which functions exist. It asks a
//! [`MetadataProvider`] for the metadata of a call and an [`ObjectsScope`]
//! for the declared type of the objects a call is written on. [`Platform`]
//! is the concrete provider, filled from built-in and JSON-described
//! extensions.

pub mod builtins;
pub mod error;
pub mod metadata;
pub mod objects;
pub mod platform;

pub use error::MetadataError;
pub use metadata::{
    BehaviorMetadata, ExpressionMetadata, Extension, ObjectMetadata, ParameterMetadata,
};
pub use objects::{ObjectDeclaration, ObjectsContainer, ObjectsScope};
pub use platform::Platform;

/// Object type of the base object. Its functions apply to every object.
pub const BASE_OBJECT_TYPE: &str = "";

/// Read-only lookup of expression metadata.
///
/// Unknown names are a normal user mistake, so every lookup returns an
/// `Option` instead of failing.
pub trait MetadataProvider: Send + Sync {
    /// A function called without qualifier: `Func(...)`.
    fn free_function(&self, name: &str) -> Option<&ExpressionMetadata>;

    /// A function called on an object: `Object.Func(...)`. Implementations
    /// fall back to base object functions.
    fn object_function(&self, object_type: &str, name: &str) -> Option<&ExpressionMetadata>;

    /// A function called on a behavior: `Object.Behavior::Func(...)`.
    fn behavior_function(&self, behavior_type: &str, name: &str) -> Option<&ExpressionMetadata>;

    fn object_metadata(&self, object_type: &str) -> Option<&ObjectMetadata>;
}
