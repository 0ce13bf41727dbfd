use std::any::Any;
use std::error::Error;
use std::sync::Arc;

/// Pointer to a service instance managed by a locator.
pub type ServicePtr<T> = Arc<T>;

/// Type-erased [ServicePtr] stored inside a locator.
pub type ServiceAnyPtr = ServicePtr<dyn Any + Send + Sync + 'static>;

/// Generic error pointer shared across trait boundaries.
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;
