//! Configuration loading and resolution.
//!
//! Every setting resolves the same way: explicit CLI value, then environment
//! variable, then built-in default.

use std::str::FromStr;

/// Largest accepted log upload (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Sessions idle longer than this are evicted.
pub const DEFAULT_SESSION_EXPIRY_HOURS: u64 = 24;

pub const ENV_MAX_UPLOAD_BYTES: &str = "COMMUGRAPH_MAX_UPLOAD_BYTES";
pub const ENV_SESSION_EXPIRY_HOURS: &str = "COMMUGRAPH_SESSION_EXPIRY_HOURS";
pub const ENV_TOKEN: &str = "COMMUGRAPH_TOKEN";

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub max_upload_bytes: usize,
    pub session_expiry_hours: u64,
    /// Bearer token required by the HTTP transport, if any.
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_expiry_hours: DEFAULT_SESSION_EXPIRY_HOURS,
            token: None,
        }
    }
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(
        max_upload_bytes: Option<usize>,
        session_expiry_hours: Option<u64>,
        token: Option<String>,
    ) -> Self {
        Self::resolve_with(max_upload_bytes, session_expiry_hours, token, |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolve against an arbitrary variable lookup.
    pub fn resolve_with(
        max_upload_bytes: Option<usize>,
        session_expiry_hours: Option<u64>,
        token: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let config = Self {
            max_upload_bytes: max_upload_bytes
                .or_else(|| parse_var(&env, ENV_MAX_UPLOAD_BYTES))
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            session_expiry_hours: session_expiry_hours
                .or_else(|| parse_var(&env, ENV_SESSION_EXPIRY_HOURS))
                .unwrap_or(DEFAULT_SESSION_EXPIRY_HOURS),
            token: token
                .or_else(|| env(ENV_TOKEN))
                .filter(|t| !t.trim().is_empty()),
        };
        tracing::debug!(
            "Resolved config: max upload {} bytes, session expiry {}h, auth {}",
            config.max_upload_bytes,
            config.session_expiry_hours,
            if config.token.is_some() { "on" } else { "off" }
        );
        config
    }

    pub fn session_expiry(&self) -> chrono::Duration {
        // Clamped to a century; chrono panics on out-of-range durations.
        chrono::Duration::hours(self.session_expiry_hours.min(876_000) as i64)
    }
}

fn parse_var<T: FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
