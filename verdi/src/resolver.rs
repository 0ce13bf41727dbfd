//! Resolution of component names to loadable classes.

use crate::registry::{ClassRegistration, ClassRegistry, VerticleRegistration};
use thiserror::Error;
use tracing::debug;

/// Suffix identifying names which denote source units rather than
/// already-built classes.
pub const SOURCE_SUFFIX: &str = ".rs";

/// Errors related to resolving a component name. A missing class is a
/// distinct, recoverable condition at binder-loading call sites, while a
/// compilation failure never is.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum ResolveError {
    #[error("Verticle class '{0}' was not found.")]
    ClassNotFound(String),
    #[error("Failed to compile verticle source '{0}': no main class could be resolved.")]
    CompileFailed(String),
}

/// Maps component names to loadable classes.
///
/// Names ending in [SOURCE_SUFFIX] denote source units: the resolver first
/// resolves the unit's main class name through the
/// [registry](crate::registry) source table, then loads that class. All
/// other names are loaded directly.
pub struct ClassResolver {
    registry: ClassRegistry,
}

impl ClassResolver {
    pub fn new() -> Self {
        Self {
            registry: ClassRegistry::from_inventory(),
        }
    }

    /// Resolves a verticle class, compiling source units first.
    pub fn resolve_verticle(&self, name: &str) -> Result<VerticleRegistration, ResolveError> {
        if name.ends_with(SOURCE_SUFFIX) {
            let main_class = self.resolve_main_class(name)?;
            debug!("Resolved source unit '{name}' to main class '{main_class}'.");
            self.load_verticle(main_class)
        } else {
            self.load_verticle(name)
        }
    }

    /// Looks up a general class which may satisfy the binder capability.
    /// Unknown names are reported as `None` so callers can degrade
    /// gracefully.
    pub fn load_class(&self, name: &str) -> Option<&'static ClassRegistration> {
        self.registry.class(name)
    }

    fn load_verticle(&self, name: &str) -> Result<VerticleRegistration, ResolveError> {
        self.registry
            .verticle(name)
            .ok_or_else(|| ResolveError::ClassNotFound(name.to_string()))
    }

    fn resolve_main_class(&self, file: &str) -> Result<&'static str, ResolveError> {
        self.registry
            .main_class_for_source(file)
            .ok_or_else(|| ResolveError::CompileFailed(file.to_string()))
    }
}

impl Default for ClassResolver {
    fn default() -> Self {
        Self::new()
    }
}
