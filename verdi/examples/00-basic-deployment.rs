use verdi::config::DeploymentConfig;
use verdi::lifecycle::{Completion, Verticle, VerticlePtr};
use verdi::loader::VerticleLoader;
use verdi::registry::VerticleRegistration;
use verdi::resolver::ClassResolver;
use verdi::runtime::Runtime;
use verdi_di::locator::Injector;
use verdi_di::service::ServicePtr;

// this is the real verticle; the loader will instantiate it lazily on start,
// with its dependencies injected from a service locator
struct HelloVerticle {
    // the host runtime handle is always injectable, courtesy of the baseline
    // runtime binder
    runtime: ServicePtr<Runtime>,
}

impl Verticle for HelloVerticle {
    fn start(&mut self, completion: Completion) -> Result<(), verdi::lifecycle::ErrorPtr> {
        println!(
            "Hello world! (logger installed: {})",
            self.runtime.config().install_tracing_logger
        );
        completion.complete();
        Ok(())
    }
}

// verticles are loaded by name, so the class has to be registered; the
// constructor pulls dependencies from the injector
fn hello_constructor(injector: &mut Injector<'_>) -> Option<VerticlePtr> {
    Some(Box::new(HelloVerticle {
        runtime: injector.get::<Runtime>()?,
    }))
}

inventory::submit! {
    VerticleRegistration {
        name: "examples::HelloVerticle",
        constructor: hello_constructor,
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let runtime = Runtime::new();

    // the loader is the deployed unit; the real verticle does not exist yet
    let mut loader = VerticleLoader::new("examples::HelloVerticle", ClassResolver::new());
    loader.init(
        runtime.clone(),
        runtime.create_context(DeploymentConfig::default()),
    );

    // start resolves the class, composes binders, builds a locator and
    // instantiates the real verticle - then forwards start to it
    let (completion, mut observer) = Completion::channel();
    loader.start(completion).expect("error starting verticle");
    observer
        .try_recv()
        .expect("start outcome not signaled")
        .expect("start outcome not signaled")
        .expect("error starting verticle");

    let (completion, _observer) = Completion::channel();
    loader.stop(completion).expect("error stopping verticle");
}
