use std::{fmt, sync::Arc};

use tracing::info;

use crate::{
    api::Api,
    config::{RobinConfig, RobinOptions},
    credentials::Credentials,
    errors::{Result, RobinError},
    grid::Grid,
};

/// Client for the Robin platform: the REST [`Api`] and the real-time [`Grid`]
pub struct Robin {
    credentials: Arc<Credentials>,
    options: RobinOptions,
    api: Api,
    grid: Grid,
}

impl Robin {
    /// Create a client for the environment and URLs in `options`.
    ///
    /// Fails with [`RobinError::Configuration`] when the access token is
    /// empty or one of the resolved URLs is unusable.
    pub fn new(access_token: impl Into<String>, options: RobinOptions) -> Result<Self> {
        let credentials = Arc::new(Credentials::new(access_token));
        let urls = options.service_urls();

        let api = match options.request_timeout {
            Some(timeout) => Api::with_timeout(credentials.clone(), &urls.core, &urls.places, timeout)?,
            None => Api::new(credentials.clone(), &urls.core, &urls.places)?,
        };
        let grid = Grid::new(credentials.clone(), &urls.grid)?;

        info!("Robin client created for the {} environment", options.env);

        Ok(Self {
            credentials,
            options,
            api,
            grid,
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &RobinConfig) -> Result<Self> {
        let access_token = config
            .access_token
            .clone()
            .ok_or_else(|| RobinError::Configuration("No access token configured".to_string()))?;

        let robin = Self::new(access_token, config.options())?;
        if let Some(relay_identifier) = &config.relay_identifier {
            robin.set_relay_identifier(relay_identifier.as_str());
        }
        Ok(robin)
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn options(&self) -> &RobinOptions {
        &self.options
    }

    /// Tag every later API request and Grid message with `relay_identifier`
    pub fn set_relay_identifier(&self, relay_identifier: impl Into<String>) {
        self.credentials.set_relay_identifier(relay_identifier);
    }

    pub fn relay_identifier(&self) -> Option<String> {
        self.credentials.relay_identifier()
    }
}

impl fmt::Debug for Robin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Robin")
            .field("credentials", &self.credentials)
            .field("options", &self.options)
            .field("api", &self.api)
            .field("grid", &self.grid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use assert_matches::assert_matches;

    #[test]
    fn requires_an_access_token() {
        assert_matches!(Robin::new("", RobinOptions::new()), Err(RobinError::Configuration(_)));
    }

    #[test]
    fn resolves_environment_urls() {
        let robin = Robin::new("foo", RobinOptions::new().with_env(Environment::Staging)).unwrap();
        assert_eq!(robin.api().core().base_url(), "https://api.staging.robinpowered.com/v1.0");
        assert_eq!(robin.api().places().base_url(), "https://apps.staging.robinpowered.com/v1.0");
        assert_eq!(robin.grid().url(), Some("https://grid.staging.robinpowered.com/v1.0"));
    }

    #[test]
    fn overrides_win_over_the_environment() {
        let options = RobinOptions::new()
            .with_env(Environment::Test)
            .with_core_url("http://localhost:8080/v1.0");
        let robin = Robin::new("foo", options).unwrap();
        assert_eq!(robin.api().core().base_url(), "http://localhost:8080/v1.0");
        assert_eq!(robin.api().places().base_url(), "http://apps.test.robinpowered.com/v1.0");
    }

    #[test]
    fn debug_output_hides_the_token() {
        let robin = Robin::new("secret-token", RobinOptions::new()).unwrap();
        let debug = format!("{:?}", robin);
        assert!(debug.contains("Robin"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn relay_identifier_is_shared() {
        let robin = Robin::new("foo", RobinOptions::new()).unwrap();
        assert_eq!(robin.relay_identifier(), None);
        robin.set_relay_identifier("relay-7");
        assert_eq!(robin.relay_identifier().as_deref(), Some("relay-7"));
    }

    #[test]
    fn from_config_applies_relay_identifier() {
        let config = RobinConfig::from_toml(
            r#"
            access_token = "foo"
            relay_identifier = "relay-9"
            env = "staging"
            "#,
        )
        .unwrap();
        let robin = Robin::from_config(&config).unwrap();
        assert_eq!(robin.relay_identifier().as_deref(), Some("relay-9"));
        assert_matches!(
            Robin::from_config(&RobinConfig::default()),
            Err(RobinError::Configuration(_))
        );
    }
}
