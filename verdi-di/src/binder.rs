//! Binding modules contribute services to a [ServiceLocator](crate::locator::ServiceLocator).
//! A [Binder] is the unit of composition - locators accept an ordered list of
//! binders and apply them in order, with later bindings for a given service
//! type overriding earlier ones.

use crate::service::{ServiceAnyPtr, ServicePtr};
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;

/// Pointer to a type-erased binder.
pub type BinderPtr = Box<dyn Binder + Send + Sync>;

/// A module contributing service bindings to a locator. Implementations should
/// be cheap to construct with [Default], since binders are typically
/// instantiated by name from a class registry.
#[cfg_attr(test, automock)]
pub trait Binder {
    /// Registers this module's bindings. Called once per locator, in binder
    /// declaration order.
    fn configure(&self, bindings: &mut ServiceBindings);
}

type ProviderFn = Box<dyn Fn() -> ServiceAnyPtr + Send + Sync>;

pub(crate) enum Binding {
    Instance(ServiceAnyPtr),
    Provider(ProviderFn),
}

impl Binding {
    pub(crate) fn provide(&self) -> ServiceAnyPtr {
        match self {
            Binding::Instance(instance) => instance.clone(),
            Binding::Provider(provider) => provider(),
        }
    }
}

/// Set of service bindings accumulated from [Binders](Binder) before any
/// instances are requested.
#[derive(Default)]
pub struct ServiceBindings {
    bindings: FxHashMap<TypeId, Binding>,
}

impl ServiceBindings {
    /// Binds an existing instance, shared by all injection points requesting
    /// `T` from the owning locator.
    pub fn bind_instance<T: Send + Sync + 'static>(&mut self, instance: T) -> &mut Self {
        self.bindings.insert(
            TypeId::of::<T>(),
            Binding::Instance(ServicePtr::new(instance) as ServiceAnyPtr),
        );
        self
    }

    /// Binds a provider invoked lazily on the first request for `T`; the
    /// created instance is then cached for the lifetime of the locator.
    pub fn bind_provider<T, F>(&mut self, provider: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.bindings.insert(
            TypeId::of::<T>(),
            Binding::Provider(Box::new(move || {
                ServicePtr::new(provider()) as ServiceAnyPtr
            })),
        );
        self
    }

    pub(crate) fn get(&self, type_id: &TypeId) -> Option<&Binding> {
        self.bindings.get(type_id)
    }

    pub(crate) fn clear(&mut self) {
        self.bindings.clear();
    }
}
