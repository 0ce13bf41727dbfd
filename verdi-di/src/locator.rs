//! The service locator and the injection façade handed to constructors.

use crate::binder::{BinderPtr, ServiceBindings};
use crate::error::{MultiError, ServiceInstanceError};
use crate::service::{ServiceAnyPtr, ServicePtr};
use fxhash::FxHashMap;
use std::any::{type_name, TypeId};
use tracing::debug;

/// Constructor for instances created through
/// [ServiceLocator::create_and_initialize]. Dependencies are pulled from the
/// [Injector]; a constructor returns `None` when any required dependency was
/// reported missing.
pub type ServiceConstructor<T> = fn(&mut Injector<'_>) -> Option<T>;

/// A dependency injection service registry scoped to a single client
/// instance.
///
/// Locators are intentionally unnamed and uncached: [create](Self::create)
/// always returns a fresh, independent locator, and nothing in this crate
/// keeps a reference to it. The owner is responsible for calling
/// [destroy](Self::destroy) exactly once when done; destruction is idempotent
/// and safe to run after a partial setup failure.
#[derive(Default)]
pub struct ServiceLocator {
    bindings: ServiceBindings,
    instances: FxHashMap<TypeId, ServiceAnyPtr>,
    destroyed: bool,
}

impl ServiceLocator {
    /// Creates a new, empty locator.
    pub fn create() -> Self {
        Self::default()
    }

    /// Applies the given binders in order. Later bindings for a service type
    /// override earlier ones, so callers control precedence through ordering.
    pub fn bind(&mut self, binders: &[BinderPtr]) {
        for binder in binders {
            binder.configure(&mut self.bindings);
        }
    }

    /// Returns the instance bound for `T`, creating and caching it first if
    /// the binding is a provider.
    pub fn service<T: Send + Sync + 'static>(
        &mut self,
    ) -> Result<ServicePtr<T>, ServiceInstanceError> {
        if self.destroyed {
            return Err(ServiceInstanceError::LocatorDestroyed);
        }

        let type_id = TypeId::of::<T>();
        let instance = if let Some(instance) = self.instances.get(&type_id) {
            instance.clone()
        } else {
            let binding = self
                .bindings
                .get(&type_id)
                .ok_or(ServiceInstanceError::UnsatisfiedDependency(
                    type_name::<T>(),
                ))?;

            let instance = binding.provide();
            self.instances.insert(type_id, instance.clone());
            instance
        };

        instance
            .downcast::<T>()
            .map_err(|_| ServiceInstanceError::IncompatibleService(type_name::<T>()))
    }

    /// Creates an instance of a client type with its dependencies injected
    /// from this locator.
    ///
    /// All dependency errors recorded during construction are aggregated into
    /// one [MultiError], so a failed composition reports every unsatisfied
    /// dependency at once instead of only the first.
    pub fn create_and_initialize<T>(
        &mut self,
        constructor: ServiceConstructor<T>,
    ) -> Result<T, MultiError> {
        let mut injector = Injector {
            locator: self,
            errors: Vec::new(),
        };

        let instance = constructor(&mut injector);
        let errors = injector.errors;
        if !errors.is_empty() {
            return Err(MultiError::new(errors));
        }

        instance.ok_or_else(|| MultiError::new(vec![ServiceInstanceError::ConstructionFailed]))
    }

    /// Releases all bindings and cached instances. Idempotent; any further
    /// [service](Self::service) request reports
    /// [LocatorDestroyed](ServiceInstanceError::LocatorDestroyed).
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        debug!("Destroying service locator.");

        self.bindings.clear();
        self.instances.clear();
        self.destroyed = true;
    }
}

/// Error-aggregating façade over a [ServiceLocator], passed to
/// [ServiceConstructor]s. Failed lookups are recorded instead of returned, so
/// a constructor can keep requesting its remaining dependencies.
pub struct Injector<'a> {
    locator: &'a mut ServiceLocator,
    errors: Vec<ServiceInstanceError>,
}

impl Injector<'_> {
    /// Requests a required dependency. On failure records the error and
    /// returns `None`; the surrounding construction will then fail with an
    /// aggregate of all recorded errors.
    pub fn get<T: Send + Sync + 'static>(&mut self) -> Option<ServicePtr<T>> {
        match self.locator.service::<T>() {
            Ok(instance) => Some(instance),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// Requests an optional dependency. A missing binding is not an error;
    /// any other failure is still recorded.
    pub fn get_optional<T: Send + Sync + 'static>(&mut self) -> Option<ServicePtr<T>> {
        match self.locator.service::<T>() {
            Ok(instance) => Some(instance),
            Err(ServiceInstanceError::UnsatisfiedDependency(_)) => None,
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }
}
