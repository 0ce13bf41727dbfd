//! The host runtime handle and per-deployment context.

use crate::config::{DeploymentConfig, RuntimeConfig};
use derive_more::Constructor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Cheaply cloneable handle to the host runtime. Every deployed verticle can
/// have the handle injected through the baseline
/// [RuntimeBinder](crate::binder::RuntimeBinder), which is how components
/// reach host facilities without global state.
#[derive(Clone, Debug)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

#[derive(Debug)]
struct RuntimeInner {
    config: RuntimeConfig,
    next_deployment_id: AtomicU64,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        if config.install_tracing_logger {
            install_tracing_logger();
        }

        Self {
            inner: Arc::new(RuntimeInner {
                config,
                next_deployment_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Creates a [Context] for a new deployment with a runtime-unique id.
    pub fn create_context(&self, config: DeploymentConfig) -> Context {
        let id = self.inner.next_deployment_id.fetch_add(1, Ordering::Relaxed);
        Context::new(format!("deployment-{id}"), config)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

fn install_tracing_logger() {
    // the embedding host may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Per-deployment context: the deployment id and its configuration.
#[derive(Clone, Debug, Constructor)]
pub struct Context {
    deployment_id: String,
    config: DeploymentConfig,
}

impl Context {
    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DeploymentConfig;
    use crate::runtime::Runtime;

    #[test]
    fn should_mint_unique_deployment_ids() {
        let runtime = Runtime::new();
        let first = runtime.create_context(DeploymentConfig::default());
        let second = runtime.create_context(DeploymentConfig::default());

        assert_ne!(first.deployment_id(), second.deployment_id());
    }

    #[test]
    fn should_share_config_between_clones() {
        let runtime = Runtime::new();
        let clone = runtime.clone();

        assert_eq!(
            runtime.config().install_tracing_logger,
            clone.config().install_tracing_logger
        );
    }
}
