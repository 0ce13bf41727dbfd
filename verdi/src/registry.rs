//! Name-based class registrations.
//!
//! Verticle and binder classes are loaded by name from configuration, so the
//! set of loadable classes has to be known to the process. Registrations are
//! submitted through [inventory] at process start:
//!
//! ```
//! use verdi::lifecycle::{Verticle, VerticlePtr};
//! use verdi::registry::VerticleRegistration;
//! use verdi_di::locator::Injector;
//!
//! struct EchoVerticle;
//!
//! impl Verticle for EchoVerticle {}
//!
//! fn echo_constructor(_injector: &mut Injector<'_>) -> Option<VerticlePtr> {
//!     Some(Box::new(EchoVerticle))
//! }
//!
//! inventory::submit! {
//!     VerticleRegistration {
//!         name: "docs::EchoVerticle",
//!         constructor: echo_constructor,
//!     }
//! }
//! ```
//!
//! A [ClassRegistry] snapshots all submissions; unknown names degrade
//! gracefully at the call sites (the loader reports and skips missing
//! binders).

use crate::lifecycle::VerticlePtr;
use fxhash::FxHashMap;
use std::any::Any;
use verdi_di::binder::{Binder, BinderPtr};
use verdi_di::locator::Injector;
use verdi_di::service::ErrorPtr;

/// Type-erased instance produced by a [ClassRegistration]. Whether it
/// satisfies the binder capability is only known after a cast attempt.
pub type AnyInstancePtr = Box<dyn Any + Send + Sync>;

/// Runtime capability check: either the instance satisfies [Binder] and is
/// returned as one, or it is handed back unchanged.
pub type BinderCastFunction = fn(AnyInstancePtr) -> Result<BinderPtr, AnyInstancePtr>;

/// Constructor for a verticle instance with dependencies pulled from the
/// given injector.
pub type VerticleConstructor = fn(&mut Injector<'_>) -> Option<VerticlePtr>;

/// A loadable verticle class.
#[derive(Clone, Copy, Debug)]
pub struct VerticleRegistration {
    pub name: &'static str,
    pub constructor: VerticleConstructor,
}

/// A source unit known to the resolver. Resolving the unit yields the name
/// of the main class its build produces.
pub struct SourceRegistration {
    pub file: &'static str,
    pub main_class: &'static str,
}

/// A loadable class which may or may not satisfy the [Binder] capability;
/// the loader validates loaded instances through [ClassRegistration::as_binder].
pub struct ClassRegistration {
    pub name: &'static str,
    pub instantiate: fn() -> Result<AnyInstancePtr, ErrorPtr>,
    pub as_binder: BinderCastFunction,
}

impl ClassRegistration {
    /// Registers a binder class constructed through [Default].
    pub const fn binder<B>(name: &'static str) -> Self
    where
        B: Binder + Default + Send + Sync + 'static,
    {
        Self {
            name,
            instantiate: instantiate_default::<B>,
            as_binder: cast_binder::<B>,
        }
    }

    /// Registers a binder class with a custom, fallible constructor. A
    /// constructor failure is structural and fatal to composition, unlike a
    /// missing or invalid binder.
    pub const fn binder_with<B>(
        name: &'static str,
        instantiate: fn() -> Result<AnyInstancePtr, ErrorPtr>,
    ) -> Self
    where
        B: Binder + Send + Sync + 'static,
    {
        Self {
            name,
            instantiate,
            as_binder: cast_binder::<B>,
        }
    }

    /// Registers a plain class without the binder capability.
    pub const fn class<T>(name: &'static str) -> Self
    where
        T: Default + Send + Sync + 'static,
    {
        Self {
            name,
            instantiate: instantiate_default::<T>,
            as_binder: cast_never,
        }
    }
}

fn instantiate_default<T: Default + Send + Sync + 'static>() -> Result<AnyInstancePtr, ErrorPtr> {
    Ok(Box::new(T::default()))
}

fn cast_binder<B: Binder + Send + Sync + 'static>(
    instance: AnyInstancePtr,
) -> Result<BinderPtr, AnyInstancePtr> {
    instance
        .downcast::<B>()
        .map(|binder| binder as BinderPtr)
}

fn cast_never(instance: AnyInstancePtr) -> Result<BinderPtr, AnyInstancePtr> {
    Err(instance)
}

inventory::collect!(VerticleRegistration);
inventory::collect!(SourceRegistration);
inventory::collect!(ClassRegistration);

/// Snapshot of all registered classes, built from the inventory.
pub struct ClassRegistry {
    verticles: FxHashMap<&'static str, VerticleRegistration>,
    sources: FxHashMap<&'static str, &'static str>,
    classes: FxHashMap<&'static str, &'static ClassRegistration>,
}

impl ClassRegistry {
    pub fn from_inventory() -> Self {
        Self {
            verticles: inventory::iter::<VerticleRegistration>
                .into_iter()
                .map(|registration| (registration.name, *registration))
                .collect(),
            sources: inventory::iter::<SourceRegistration>
                .into_iter()
                .map(|registration| (registration.file, registration.main_class))
                .collect(),
            classes: inventory::iter::<ClassRegistration>
                .into_iter()
                .map(|registration| (registration.name, registration))
                .collect(),
        }
    }

    pub fn verticle(&self, name: &str) -> Option<VerticleRegistration> {
        self.verticles.get(name).copied()
    }

    pub fn main_class_for_source(&self, file: &str) -> Option<&'static str> {
        self.sources.get(file).copied()
    }

    pub fn class(&self, name: &str) -> Option<&'static ClassRegistration> {
        self.classes.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::{AnyInstancePtr, ClassRegistration, ClassRegistry};
    use verdi_di::binder::{Binder, ServiceBindings};

    #[derive(Default)]
    struct MarkerBinder;

    impl Binder for MarkerBinder {
        fn configure(&self, bindings: &mut ServiceBindings) {
            bindings.bind_instance("marker".to_string());
        }
    }

    inventory::submit! {
        ClassRegistration::binder::<MarkerBinder>("registry_tests::MarkerBinder")
    }

    inventory::submit! {
        ClassRegistration::class::<String>("registry_tests::NotABinder")
    }

    #[test]
    fn should_cast_registered_binder_class() {
        let registry = ClassRegistry::from_inventory();
        let registration = registry.class("registry_tests::MarkerBinder").unwrap();

        let instance = (registration.instantiate)().unwrap();
        assert!((registration.as_binder)(instance).is_ok());
    }

    #[test]
    fn should_reject_cast_for_plain_class() {
        let registry = ClassRegistry::from_inventory();
        let registration = registry.class("registry_tests::NotABinder").unwrap();

        let instance: AnyInstancePtr = (registration.instantiate)().unwrap();
        assert!((registration.as_binder)(instance).is_err());
    }

    #[test]
    fn should_not_find_unregistered_class() {
        let registry = ClassRegistry::from_inventory();
        assert!(registry.class("registry_tests::Missing").is_none());
    }
}
