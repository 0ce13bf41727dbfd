//! Framework binders and the failure-isolated binder composition step.

use crate::config::BOOTSTRAP_BINDER_NAME;
use crate::registry::ClassRegistration;
use crate::resolver::ClassResolver;
use crate::runtime::Runtime;
use std::fmt::{self, Debug, Formatter};
use thiserror::Error;
use tracing::{error, warn};
use verdi_di::binder::{Binder, BinderPtr, ServiceBindings};
use verdi_di::service::ErrorPtr;

/// Baseline binder always composed first: exposes the host [Runtime] handle
/// as an injectable service.
pub struct RuntimeBinder {
    runtime: Runtime,
}

impl RuntimeBinder {
    pub fn new(runtime: Runtime) -> Self {
        Self { runtime }
    }
}

impl Binder for RuntimeBinder {
    fn configure(&self, bindings: &mut ServiceBindings) {
        bindings.bind_instance(self.runtime.clone());
    }
}

/// Default bootstrap binder, loaded when a deployment declares no binder of
/// its own. Contributes no bindings; deployments needing injection declare
/// their own binders under
/// [CONFIG_BOOTSTRAP_BINDER_NAME](crate::config::CONFIG_BOOTSTRAP_BINDER_NAME).
#[derive(Default)]
pub struct BootstrapBinder;

impl Binder for BootstrapBinder {
    fn configure(&self, _bindings: &mut ServiceBindings) {}
}

inventory::submit! {
    ClassRegistration::binder::<BootstrapBinder>(BOOTSTRAP_BINDER_NAME)
}

/// A declared bootstrap binder class could not be instantiated. Unlike a
/// missing or invalid binder this is a structural problem with a configured
/// class, so it is fatal to composition.
#[derive(Error, Debug)]
#[error("Bootstrap binder class '{name}' could not be instantiated: {cause}")]
pub struct BinderInstantiationError {
    pub name: String,
    pub cause: ErrorPtr,
}

/// Recoverable per-entry outcome for a declared binder which was skipped.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum BinderIssue {
    /// No class is registered under the declared name.
    NotFound(String),
    /// A class was found, but its instances do not satisfy the [Binder]
    /// capability.
    NotABinder(String),
}

pub(crate) struct BinderComposition {
    pub binders: Vec<BinderPtr>,
    pub issues: Vec<BinderIssue>,
}

// binders are type-erased, so only their count is rendered
impl Debug for BinderComposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderComposition")
            .field("binders", &self.binders.len())
            .field("issues", &self.issues)
            .finish()
    }
}

/// Loads the declared binder classes in order, isolating per-entry failures:
/// a missing or invalid entry is reported and skipped without affecting the
/// entries already loaded or still to come.
pub(crate) fn load_binders(
    resolver: &ClassResolver,
    names: &[String],
) -> Result<BinderComposition, BinderInstantiationError> {
    let mut binders = Vec::with_capacity(names.len());
    let mut issues = Vec::new();

    for name in names {
        let Some(registration) = resolver.load_class(name) else {
            warn!("Bootstrap binder class {name} was not found. Are you missing injection bindings?");
            issues.push(BinderIssue::NotFound(name.clone()));
            continue;
        };

        let instance =
            (registration.instantiate)().map_err(|cause| BinderInstantiationError {
                name: name.clone(),
                cause,
            })?;

        match (registration.as_binder)(instance) {
            Ok(binder) => binders.push(binder),
            Err(_) => {
                error!("Class {name} does not implement Binder.");
                issues.push(BinderIssue::NotABinder(name.clone()));
            }
        }
    }

    Ok(BinderComposition { binders, issues })
}

#[cfg(test)]
mod tests {
    use crate::binder::{load_binders, BinderIssue};
    use crate::registry::{AnyInstancePtr, ClassRegistration};
    use crate::resolver::ClassResolver;
    use verdi_di::binder::{Binder, ServiceBindings};
    use verdi_di::error::ServiceInstanceError;
    use verdi_di::locator::ServiceLocator;
    use verdi_di::service::ErrorPtr;

    #[derive(Default)]
    struct FirstBinder;

    impl Binder for FirstBinder {
        fn configure(&self, bindings: &mut ServiceBindings) {
            bindings.bind_instance(1i64);
        }
    }

    #[derive(Default)]
    struct SecondBinder;

    impl Binder for SecondBinder {
        fn configure(&self, bindings: &mut ServiceBindings) {
            bindings.bind_instance(2i64);
        }
    }

    #[derive(Default)]
    struct FailingBinder;

    impl Binder for FailingBinder {
        fn configure(&self, _bindings: &mut ServiceBindings) {}
    }

    fn failing_constructor() -> Result<AnyInstancePtr, ErrorPtr> {
        Err(std::sync::Arc::new(ServiceInstanceError::ConstructionFailed) as ErrorPtr)
    }

    inventory::submit! {
        ClassRegistration::binder::<FirstBinder>("binder_tests::FirstBinder")
    }

    inventory::submit! {
        ClassRegistration::binder::<SecondBinder>("binder_tests::SecondBinder")
    }

    inventory::submit! {
        ClassRegistration::class::<i8>("binder_tests::NotABinder")
    }

    inventory::submit! {
        ClassRegistration::binder_with::<FailingBinder>(
            "binder_tests::FailingBinder",
            failing_constructor
        )
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn should_load_declared_binders_in_order() {
        let resolver = ClassResolver::new();
        let composition = load_binders(
            &resolver,
            &names(&["binder_tests::FirstBinder", "binder_tests::SecondBinder"]),
        )
        .unwrap();

        assert_eq!(composition.binders.len(), 2);
        assert!(composition.issues.is_empty());

        // declared order is preserved, so the later binding wins
        let mut locator = ServiceLocator::create();
        locator.bind(&composition.binders);
        assert_eq!(*locator.service::<i64>().unwrap(), 2);
    }

    #[test]
    fn should_skip_missing_binder_with_single_issue() {
        let resolver = ClassResolver::new();
        let composition = load_binders(
            &resolver,
            &names(&["binder_tests::Missing", "binder_tests::FirstBinder"]),
        )
        .unwrap();

        assert_eq!(composition.binders.len(), 1);
        assert_eq!(
            composition.issues,
            vec![BinderIssue::NotFound("binder_tests::Missing".to_string())]
        );
    }

    #[test]
    fn should_skip_non_binder_class_with_single_issue() {
        let resolver = ClassResolver::new();
        let composition = load_binders(
            &resolver,
            &names(&["binder_tests::NotABinder", "binder_tests::FirstBinder"]),
        )
        .unwrap();

        assert_eq!(composition.binders.len(), 1);
        assert_eq!(
            composition.issues,
            vec![BinderIssue::NotABinder(
                "binder_tests::NotABinder".to_string()
            )]
        );
    }

    #[test]
    fn should_fail_composition_on_instantiation_error() {
        let resolver = ClassResolver::new();
        let error = load_binders(&resolver, &names(&["binder_tests::FailingBinder"])).unwrap_err();

        assert_eq!(error.name, "binder_tests::FailingBinder");
    }
}
