use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Errors related to providing single service instances from a locator.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ServiceInstanceError {
    #[error("No binding found for service type '{0}' - are you missing injection bindings?")]
    UnsatisfiedDependency(&'static str),
    #[error("Tried to downcast a bound service to incompatible type: {0}")]
    IncompatibleService(&'static str),
    #[error("Service locator has already been destroyed.")]
    LocatorDestroyed,
    #[error("Service constructor did not produce an instance.")]
    ConstructionFailed,
}

/// Aggregate of all errors encountered while creating and initializing a
/// single instance. Instantiation collects every unsatisfied dependency
/// before failing, so one failed composition reports all of its causes.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MultiError {
    errors: Vec<ServiceInstanceError>,
}

impl MultiError {
    pub fn new(errors: Vec<ServiceInstanceError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ServiceInstanceError] {
        &self.errors
    }
}

impl Display for MultiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Service instantiation failed with {} error(s)",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "; {error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for MultiError {}

#[cfg(test)]
mod tests {
    use crate::error::{MultiError, ServiceInstanceError};

    #[test]
    fn should_render_all_aggregated_errors() {
        let error = MultiError::new(vec![
            ServiceInstanceError::UnsatisfiedDependency("a::B"),
            ServiceInstanceError::LocatorDestroyed,
        ]);

        let rendered = error.to_string();
        assert!(rendered.contains("2 error(s)"));
        assert!(rendered.contains("a::B"));
        assert!(rendered.contains("destroyed"));
    }
}
