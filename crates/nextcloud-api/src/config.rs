// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · config
// ──────────────────────────────────────────────────────────────────────────────
// Client configuration: server endpoint, credentials and output format.
// Can be built directly, deserialized, or read from the environment.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NextcloudError, NextcloudResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ENV_HOST: &str = "NEXTCLOUD_HOST";
pub const ENV_USERNAME: &str = "NEXTCLOUD_USERNAME";
pub const ENV_PASSWORD: &str = "NEXTCLOUD_PASSWORD";
pub const ENV_JSON_OUTPUT: &str = "NEXTCLOUD_JSON_OUTPUT";

/// Connection settings for a single Nextcloud account.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the instance, e.g. `https://cloud.example.com`.
    pub endpoint: String,
    /// Login name used for HTTP basic auth.
    pub user: String,
    /// Password or app password.
    pub password: String,
    /// Ask OCS endpoints for JSON (`?format=json`) instead of legacy XML.
    #[serde(default = "default_json_output")]
    pub json_output: bool,
}

fn default_json_output() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            user: String::new(),
            password: String::new(),
            json_output: true,
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: &str, user: &str, password: &str) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint),
            user: user.to_string(),
            password: password.to_string(),
            json_output: true,
        }
    }

    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }

    /// Read `NEXTCLOUD_HOST`, `NEXTCLOUD_USERNAME`, `NEXTCLOUD_PASSWORD` and
    /// the optional `NEXTCLOUD_JSON_OUTPUT` from the process environment.
    pub fn from_env() -> NextcloudResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> NextcloudResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_HOST)
            .ok_or_else(|| NextcloudError::Config(format!("{} is not set", ENV_HOST)))?;
        let user = lookup(ENV_USERNAME).unwrap_or_default();
        let password = lookup(ENV_PASSWORD).unwrap_or_default();
        let json_output = match lookup(ENV_JSON_OUTPUT) {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                NextcloudError::Config(format!("{} must be a boolean, got '{}'", ENV_JSON_OUTPUT, v))
            })?,
            None => true,
        };

        let endpoint = if host.contains("://") {
            host
        } else {
            format!("http://{}", host)
        };

        let config = Self::new(&endpoint, &user, &password).with_json_output(json_output);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NextcloudResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(NextcloudError::Config("endpoint is empty".into()));
        }
        url::Url::parse(&self.endpoint).map_err(|e| {
            NextcloudError::Config(format!("endpoint '{}' is not a URL: {}", self.endpoint, e))
        })?;
        if self.user.is_empty() {
            return Err(NextcloudError::Config("user is empty".into()));
        }
        Ok(())
    }

    pub fn masked_password(&self) -> String {
        if self.password.chars().count() <= 4 {
            return "****".to_string();
        }
        let head: String = self.password.chars().take(4).collect();
        format!("{}****", head)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("user", &self.user)
            .field("password", &"****")
            .field("json_output", &self.json_output)
            .finish()
    }
}

pub(crate) fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
