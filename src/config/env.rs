//! Deployment environment overlay.
//!
//! The deployment version and host identifier are injected by the container
//! runtime. They are read once at startup and never again.

use crate::config::schema::AppConfig;

/// Environment variable carrying the deployment version.
pub const VERSION_VAR: &str = "HELLOWORLD_VERSION";

/// Environment variable carrying the host identifier.
pub const HOSTNAME_VAR: &str = "HOSTNAME";

/// Value used when neither the environment nor the config file provides one.
pub const UNKNOWN: &str = "unknown";

/// Resolved, immutable deployment identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub version: String,
    pub hostname: String,
    pub appname: String,
}

/// Apply environment overrides using the process environment.
pub fn apply_env(config: &mut AppConfig) {
    apply_env_from(config, |key| std::env::var(key).ok());
}

/// Apply environment overrides from an arbitrary lookup.
///
/// Empty values are treated as unset.
pub fn apply_env_from<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(version) = non_empty(VERSION_VAR) {
        config.deployment.version = Some(version);
    }
    if let Some(hostname) = non_empty(HOSTNAME_VAR) {
        config.deployment.hostname = Some(hostname);
    }
}

impl Deployment {
    /// Resolve the deployment identity, falling back to [`UNKNOWN`].
    pub fn from_config(config: &AppConfig) -> Self {
        let deployment = &config.deployment;

        let version = deployment.version.clone().unwrap_or_else(|| {
            tracing::warn!(var = VERSION_VAR, "Deployment version not set");
            UNKNOWN.to_string()
        });
        let hostname = deployment.hostname.clone().unwrap_or_else(|| {
            tracing::warn!(var = HOSTNAME_VAR, "Hostname not set");
            UNKNOWN.to_string()
        });

        Self {
            version,
            hostname,
            appname: deployment.appname.clone(),
        }
    }
}
