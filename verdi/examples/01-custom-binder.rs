// note: this example assumes you've analyzed the previous one

use verdi::config::{DeploymentConfig, CONFIG_BOOTSTRAP_BINDER_NAME};
use verdi::lifecycle::{Completion, Verticle, VerticlePtr};
use verdi::loader::VerticleLoader;
use verdi::registry::{ClassRegistration, VerticleRegistration};
use verdi::resolver::ClassResolver;
use verdi::runtime::Runtime;
use verdi_di::binder::{Binder, ServiceBindings};
use verdi_di::locator::Injector;
use verdi_di::service::ServicePtr;

struct Greeter {
    greeting: &'static str,
}

// a binder contributes bindings to the locator the real verticle is built
// from; it is declared in deployment config by name
#[derive(Default)]
struct GreeterBinder;

impl Binder for GreeterBinder {
    fn configure(&self, bindings: &mut ServiceBindings) {
        bindings.bind_instance(Greeter {
            greeting: "Hello from an injected service!",
        });
    }
}

inventory::submit! {
    ClassRegistration::binder::<GreeterBinder>("examples::GreeterBinder")
}

struct GreetingVerticle {
    greeter: ServicePtr<Greeter>,
}

impl Verticle for GreetingVerticle {
    fn start(&mut self, completion: Completion) -> Result<(), verdi::lifecycle::ErrorPtr> {
        println!("{}", self.greeter.greeting);
        completion.complete();
        Ok(())
    }
}

fn greeting_constructor(injector: &mut Injector<'_>) -> Option<VerticlePtr> {
    Some(Box::new(GreetingVerticle {
        greeter: injector.get::<Greeter>()?,
    }))
}

inventory::submit! {
    VerticleRegistration {
        name: "examples::GreetingVerticle",
        constructor: greeting_constructor,
    }
}

fn main() {
    let runtime = Runtime::new();

    // declare the binder in deployment config; an ordered list of names is
    // accepted too
    let mut config = DeploymentConfig::default();
    config.set(CONFIG_BOOTSTRAP_BINDER_NAME, "examples::GreeterBinder");

    let mut loader = VerticleLoader::new("examples::GreetingVerticle", ClassResolver::new());
    loader.init(runtime.clone(), runtime.create_context(config));

    // prints "Hello from an injected service!"
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
