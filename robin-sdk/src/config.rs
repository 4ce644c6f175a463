use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Result, RobinError};

const ROBIN_HOST_STUB: &str = ".robinpowered.com";
const API_VERSION: &str = "v1.0";

/// The Robin deployment that default URLs point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = RobinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "test" => Ok(Environment::Test),
            _ => Err(RobinError::Configuration(format!(
                "{} is not a valid Robin environment",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = RobinError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// The Robin services the SDK talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Core,
    Places,
    Grid,
}

impl Service {
    /// Host prefix of the service's default URL
    fn host_name(&self) -> &'static str {
        match self {
            Service::Core => "api",
            Service::Places => "apps",
            Service::Grid => "grid",
        }
    }

    /// Default base URL of this service in `env`
    pub fn default_url(&self, env: Environment) -> String {
        let (protocol, env_part) = match env {
            Environment::Production => ("https://", String::new()),
            Environment::Staging => ("https://", ".staging".to_string()),
            Environment::Test => ("http://", ".test".to_string()),
        };
        format!(
            "{}{}{}{}/{}",
            protocol,
            self.host_name(),
            env_part,
            ROBIN_HOST_STUB,
            API_VERSION
        )
    }
}

/// Per-service base URL overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UrlOverrides {
    pub core: Option<String>,
    pub places: Option<String>,
    pub grid: Option<String>,
}

/// Resolved base URLs, fixed for the lifetime of a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub core: String,
    pub places: String,
    pub grid: String,
}

impl ServiceUrls {
    pub fn resolve(env: Environment, overrides: &UrlOverrides) -> Self {
        let pick = |service: Service, over: &Option<String>| {
            over.clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| service.default_url(env))
        };
        Self {
            core: pick(Service::Core, &overrides.core),
            places: pick(Service::Places, &overrides.places),
            grid: pick(Service::Grid, &overrides.grid),
        }
    }
}

/// Options for constructing a [`Robin`](crate::Robin) client
#[derive(Debug, Clone, Default)]
pub struct RobinOptions {
    pub env: Environment,
    pub urls: UrlOverrides,
    /// Timeout applied by the HTTP client to each request. None means the
    /// request may stay pending as long as the server keeps it open.
    pub request_timeout: Option<Duration>,
}

impl RobinOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_core_url(mut self, url: impl Into<String>) -> Self {
        self.urls.core = Some(url.into());
        self
    }

    pub fn with_places_url(mut self, url: impl Into<String>) -> Self {
        self.urls.places = Some(url.into());
        self
    }

    pub fn with_grid_url(mut self, url: impl Into<String>) -> Self {
        self.urls.grid = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn service_urls(&self) -> ServiceUrls {
        ServiceUrls::resolve(self.env, &self.urls)
    }
}

/// File and environment backed configuration for programs built on the SDK
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RobinConfig {
    pub access_token: Option<String>,
    pub relay_identifier: Option<String>,
    pub env: Environment,
    pub urls: UrlOverrides,
    pub request_timeout_secs: Option<u64>,
}

impl RobinConfig {
    /// Load from the TOML file named by `ROBIN_CONFIG_PATH` (defaults when
    /// absent), then apply `ROBIN_*` environment variable overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("ROBIN_CONFIG_PATH") {
            Ok(path) if std::path::Path::new(&path).exists() => {
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    RobinError::Configuration(format!(
                        "Failed to read config file {}: {}",
                        path, e
                    ))
                })?;
                Self::from_toml(&contents)?
            }
            _ => Self::default(),
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| {
            RobinError::Configuration(format!("Failed to parse config file: {}", e))
        })
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(token) = std::env::var("ROBIN_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Ok(relay) = std::env::var("ROBIN_RELAY_IDENTIFIER") {
            self.relay_identifier = Some(relay);
        }
        if let Ok(env) = std::env::var("ROBIN_ENV") {
            self.env = env.parse()?;
        }
        if let Ok(url) = std::env::var("ROBIN_CORE_URL") {
            self.urls.core = Some(url);
        }
        if let Ok(url) = std::env::var("ROBIN_PLACES_URL") {
            self.urls.places = Some(url);
        }
        if let Ok(url) = std::env::var("ROBIN_GRID_URL") {
            self.urls.grid = Some(url);
        }
        if let Ok(secs) = std::env::var("ROBIN_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(secs.parse().map_err(|e| {
                RobinError::Configuration(format!("Invalid request timeout: {}", e))
            })?);
        }
        Ok(())
    }

    pub fn options(&self) -> RobinOptions {
        RobinOptions {
            env: self.env,
            urls: self.urls.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}
