//! Lazy-loading shim bridging the verticle lifecycle with dependency
//! injection.

use crate::binder::{load_binders, BinderInstantiationError, RuntimeBinder};
use crate::lifecycle::{Completion, Verticle, VerticlePtr};
use crate::resolver::{ClassResolver, ResolveError};
use crate::runtime::{Context, Runtime};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use verdi_di::binder::BinderPtr;
use verdi_di::error::MultiError;
use verdi_di::locator::ServiceLocator;
use verdi_di::service::ErrorPtr;

/// Errors fatal to composing the real verticle. All of these are reported
/// through the completion handle given to [VerticleLoader]'s start, since
/// they occur strictly before the real verticle exists.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    BinderInstantiation(#[from] BinderInstantiationError),
    #[error(transparent)]
    Injection(#[from] MultiError),
    #[error("Loader lifecycle invoked before init.")]
    NotInitialized,
    #[error("Class resolver has been released; a loader cannot be started after stop.")]
    ResolverReleased,
}

/// Verticle which lazy-loads the real verticle with dependency injection.
///
/// The loader is what the host runtime actually deploys. It holds the real
/// verticle's name and a class resolver; on start it resolves the class
/// (compiling source units first), loads the bootstrap binders declared in
/// deployment configuration, builds a fresh [ServiceLocator] for this one
/// instance, instantiates the real verticle through it and from then on only
/// forwards lifecycle calls.
///
/// Lifecycle outcomes are split by where a failure happens: everything up to
/// and including instantiation is reported by failing the start completion
/// (the loader never throws for its own composition), while a synchronous
/// error from the real verticle's start or stop propagates to the caller
/// untouched, with the completion handle left unfired. The locator is
/// destroyed on stop unconditionally, even when the real verticle was never
/// created.
pub struct VerticleLoader {
    verticle_name: String,
    resolver: Option<ClassResolver>,
    runtime: Option<Runtime>,
    context: Option<Context>,
    real_verticle: Option<VerticlePtr>,
    locator: Option<ServiceLocator>,
}

impl VerticleLoader {
    pub fn new(verticle_name: impl Into<String>, resolver: ClassResolver) -> Self {
        Self {
            verticle_name: verticle_name.into(),
            resolver: Some(resolver),
            runtime: None,
            context: None,
            real_verticle: None,
            locator: None,
        }
    }

    /// Name of the verticle this loader deploys.
    pub fn verticle_name(&self) -> &str {
        &self.verticle_name
    }

    fn create_real_verticle(
        &mut self,
        runtime: &Runtime,
        context: &Context,
    ) -> Result<VerticlePtr, LoaderError> {
        let resolver = self.resolver.as_ref().ok_or(LoaderError::ResolverReleased)?;
        let class = resolver.resolve_verticle(&self.verticle_name)?;

        let binder_names = context.config().bootstrap_binder_names();
        let composition = load_binders(resolver, &binder_names)?;

        // The baseline runtime binder is always present and always first,
        // regardless of how many declared binders loaded.
        let mut binders: Vec<BinderPtr> = Vec::with_capacity(composition.binders.len() + 1);
        binders.push(Box::new(RuntimeBinder::new(runtime.clone())));
        binders.extend(composition.binders);

        // Each loader gets its own locator instance, never cached or shared,
        // so every deployed verticle has independent injected state.
        let locator = self.locator.insert(ServiceLocator::create());
        locator.bind(&binders);

        debug!(
            "Creating verticle instance '{}' with {} binder(s).",
            class.name,
            binders.len()
        );

        Ok(locator.create_and_initialize(class.constructor)?)
    }
}

impl Verticle for VerticleLoader {
    fn init(&mut self, runtime: Runtime, context: Context) {
        self.runtime = Some(runtime);
        self.context = Some(context);
    }

    fn start(&mut self, completion: Completion) -> Result<(), ErrorPtr> {
        let (Some(runtime), Some(context)) = (self.runtime.clone(), self.context.clone()) else {
            completion.fail(Arc::new(LoaderError::NotInitialized));
            return Ok(());
        };

        // Create the real verticle. Composition failures are reported through
        // the completion handle, and a locator created before the failure
        // must not leak.
        let mut verticle = match self.create_real_verticle(&runtime, &context) {
            Ok(verticle) => verticle,
            Err(error) => {
                if let Some(mut locator) = self.locator.take() {
                    locator.destroy();
                }
                completion.fail(Arc::new(error));
                return Ok(());
            }
        };

        // Init and start the real verticle. Completion now belongs to the
        // real verticle, as does any synchronous start error.
        verticle.init(runtime, context);
        let verticle = self.real_verticle.insert(verticle);
        verticle.start(completion)
    }

    fn stop(&mut self, completion: Completion) -> Result<(), ErrorPtr> {
        self.resolver = None;

        // Destroy the service locator even if the real verticle was never
        // created.
        if let Some(mut locator) = self.locator.take() {
            locator.destroy();
        }

        // Forward stop to the real verticle, passing completion through
        // untouched. Without a real verticle there is nothing to forward.
        match self.real_verticle.take() {
            Some(mut verticle) => verticle.stop(completion),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DeploymentConfig;
    use crate::lifecycle::{Completion, MockVerticle, Verticle, VerticlePtr};
    use crate::loader::{LoaderError, VerticleLoader};
    use crate::registry::VerticleRegistration;
    use crate::resolver::ClassResolver;
    use crate::runtime::Runtime;
    use verdi_di::locator::Injector;

    struct NoopVerticle;

    impl Verticle for NoopVerticle {}

    fn noop_constructor(_injector: &mut Injector<'_>) -> Option<VerticlePtr> {
        Some(Box::new(NoopVerticle))
    }

    inventory::submit! {
        VerticleRegistration {
            name: "loader_tests::NoopVerticle",
            constructor: noop_constructor,
        }
    }

    fn forwarding_constructor(_injector: &mut Injector<'_>) -> Option<VerticlePtr> {
        let mut verticle = MockVerticle::new();
        verticle.expect_init().times(1).return_const(());
        verticle.expect_start().times(1).returning(|completion| {
            completion.complete();
            Ok(())
        });
        verticle.expect_stop().times(1).returning(|completion| {
            completion.complete();
            Ok(())
        });

        Some(Box::new(verticle))
    }

    inventory::submit! {
        VerticleRegistration {
            name: "loader_tests::ForwardingVerticle",
            constructor: forwarding_constructor,
        }
    }

    #[test]
    fn should_expose_verticle_name() {
        let loader = VerticleLoader::new("loader_tests::NoopVerticle", ClassResolver::new());
        assert_eq!(loader.verticle_name(), "loader_tests::NoopVerticle");
    }

    #[test]
    fn should_fail_start_when_not_initialized() {
        let mut loader = VerticleLoader::new("loader_tests::NoopVerticle", ClassResolver::new());

        let (completion, mut observer) = Completion::channel();
        loader.start(completion).unwrap();

        let outcome = observer.try_recv().unwrap().unwrap();
        let error = outcome.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<LoaderError>(),
            Some(LoaderError::NotInitialized)
        ));
    }

    #[test]
    fn should_fail_start_after_stop_released_the_resolver() {
        let runtime = Runtime::new();
        let mut loader = VerticleLoader::new("loader_tests::NoopVerticle", ClassResolver::new());
        loader.init(
            runtime.clone(),
            runtime.create_context(DeploymentConfig::default()),
        );

        let (completion, _observer) = Completion::channel();
        loader.stop(completion).unwrap();

        let (completion, mut observer) = Completion::channel();
        loader.start(completion).unwrap();

        let outcome = observer.try_recv().unwrap().unwrap();
        let error = outcome.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<LoaderError>(),
            Some(LoaderError::ResolverReleased)
        ));
    }

    #[test]
    fn should_forward_lifecycle_calls_to_real_verticle_exactly_once() {
        let runtime = Runtime::new();
        let mut loader =
            VerticleLoader::new("loader_tests::ForwardingVerticle", ClassResolver::new());
        loader.init(
            runtime.clone(),
            runtime.create_context(DeploymentConfig::default()),
        );

        let (completion, mut observer) = Completion::channel();
        loader.start(completion).unwrap();
        assert!(matches!(observer.try_recv(), Ok(Some(Ok(())))));

        // dropping the mock on stop verifies the expected call counts
        let (completion, mut observer) = Completion::channel();
        loader.stop(completion).unwrap();
        assert!(matches!(observer.try_recv(), Ok(Some(Ok(())))));
    }

    #[test]
    fn should_stop_without_real_verticle() {
        let runtime = Runtime::new();
        let mut loader = VerticleLoader::new("loader_tests::NoopVerticle", ClassResolver::new());
        loader.init(
            runtime.clone(),
            runtime.create_context(DeploymentConfig::default()),
        );

        let (completion, mut observer) = Completion::channel();
        loader.stop(completion).unwrap();

        // nothing to forward to - the handle is dropped unfired
        assert!(observer.try_recv().is_err());
    }
}
