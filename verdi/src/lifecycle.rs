//! The verticle lifecycle contract and the single-fire completion handle
//! through which asynchronous start/stop outcomes are signaled.

use crate::runtime::{Context, Runtime};
use futures::channel::oneshot;
#[cfg(test)]
use mockall::automock;
pub use verdi_di::service::ErrorPtr;

/// Pointer to a type-erased verticle.
pub type VerticlePtr = Box<dyn Verticle + Send>;

/// Outcome of an asynchronous lifecycle transition.
pub type LifecycleResult = Result<(), ErrorPtr>;

/// Observer end of a [Completion]. The host keeps this end to learn when (and
/// how) a lifecycle transition finished. A dropped, unfired [Completion] is
/// visible here as a closed channel.
pub type CompletionObserver = oneshot::Receiver<LifecycleResult>;

/// Single-fire handle signaling the outcome of an asynchronous lifecycle
/// transition. Completing or failing consumes the handle, so an outcome can
/// be signaled at most once. Cancellation is not supported.
pub struct Completion {
    sender: oneshot::Sender<LifecycleResult>,
}

impl Completion {
    /// Creates a connected handle/observer pair.
    pub fn channel() -> (Self, CompletionObserver) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Signals successful completion. The observer may already have gone
    /// away, in which case the signal is discarded.
    pub fn complete(self) {
        let _ = self.sender.send(Ok(()));
    }

    /// Signals failure with the given cause.
    pub fn fail(self, cause: ErrorPtr) {
        let _ = self.sender.send(Err(cause));
    }
}

/// The unit of deployable logic. The host runtime drives each instance
/// through `init`, `start` and eventually `stop`, never overlapping calls for
/// one instance.
///
/// `start` and `stop` receive a [Completion] to signal their asynchronous
/// outcome; the default implementations complete immediately. Returning `Err`
/// from `start` or `stop` reports a synchronous failure to the direct caller
/// instead - in that case the completion handle should be left untouched.
#[cfg_attr(test, automock)]
pub trait Verticle {
    /// Called once before `start` with the host handles.
    fn init(&mut self, runtime: Runtime, context: Context) {
        let _ = (runtime, context);
    }

    /// Starts the verticle. Completion may be signaled after this method
    /// returns, e.g. once nested deployments have finished.
    fn start(&mut self, completion: Completion) -> Result<(), ErrorPtr> {
        completion.complete();
        Ok(())
    }

    /// Stops the verticle; any cleanup belongs here.
    fn stop(&mut self, completion: Completion) -> Result<(), ErrorPtr> {
        completion.complete();
        Ok(())
    }
}
