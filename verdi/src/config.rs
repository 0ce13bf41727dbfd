//! Runtime and deployment configuration.
//!
//! [RuntimeConfig] configures the host runtime itself and is created with
//! opinionated defaults, which can be overwritten by environment variables
//! prefixed with `VERDI_` or a `verdi.json` file. [DeploymentConfig] is the
//! structured configuration attached to a single deployment and carries,
//! among arbitrary host data, the bootstrap binder declaration consumed by
//! the [loader](crate::loader).

use config::{Config, ConfigError, Environment, File, Map, Value, ValueKind};
use serde::Deserialize;
use tracing::warn;

const CONFIG_ENV_PREFIX: &str = "VERDI";

/// Name of the default runtime config file.
pub const CONFIG_FILE: &str = "verdi.json";

/// Deployment-config key under which bootstrap binders are declared. The
/// value may be a single binder class name or an ordered list of names.
pub const CONFIG_BOOTSTRAP_BINDER_NAME: &str = "di_binder";

/// Binder class name used when a deployment declares no binder of its own.
pub const BOOTSTRAP_BINDER_NAME: &str = "verdi::binder::BootstrapBinder";

/// Host runtime configuration.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Should a default tracing logger be installed in the scope of the
    /// runtime.
    pub install_tracing_logger: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
        }
    }
}

impl From<OptionalRuntimeConfig> for RuntimeConfig {
    fn from(value: OptionalRuntimeConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
        }
    }
}

impl RuntimeConfig {
    /// Creates a config from the optional config file and environment
    /// overrides, falling back to defaults for missing values.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalRuntimeConfig>())
            .map(|config| config.into())
    }
}

#[derive(Deserialize)]
struct OptionalRuntimeConfig {
    install_tracing_logger: Option<bool>,
}

/// Structured configuration attached to a single deployment.
#[derive(Clone, Debug, Default)]
pub struct DeploymentConfig {
    values: Map<String, Value>,
}

impl DeploymentConfig {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set<V: Into<Value>>(&mut self, key: impl Into<String>, value: V) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns the declared bootstrap binder names, in declaration order.
    ///
    /// The declaration under [CONFIG_BOOTSTRAP_BINDER_NAME] is normalized to
    /// a list: a missing or nil value yields the default
    /// [BOOTSTRAP_BINDER_NAME], a scalar yields that single name and an array
    /// is taken as given. Array entries which cannot be read as strings are
    /// skipped with a warning.
    pub fn bootstrap_binder_names(&self) -> Vec<String> {
        let Some(value) = self.get(CONFIG_BOOTSTRAP_BINDER_NAME) else {
            return vec![BOOTSTRAP_BINDER_NAME.to_string()];
        };

        match &value.kind {
            ValueKind::Nil => vec![BOOTSTRAP_BINDER_NAME.to_string()],
            ValueKind::Array(values) => values
                .iter()
                .filter_map(|value| match value.clone().into_string() {
                    Ok(name) => Some(name),
                    Err(_) => {
                        warn!("Ignoring non-string bootstrap binder declaration entry: {value:?}");
                        None
                    }
                })
                .collect(),
            _ => match value.clone().into_string() {
                Ok(name) => vec![name],
                Err(_) => {
                    warn!("Ignoring non-string bootstrap binder declaration: {value:?}");
                    vec![BOOTSTRAP_BINDER_NAME.to_string()]
                }
            },
        }
    }
}
