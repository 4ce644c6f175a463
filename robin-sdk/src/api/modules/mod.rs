//! Resource modules of the Core and Places APIs.
//!
//! Every operation validates its required arguments, builds the resource
//! path and hands the request to the matching [`RequestClient`] verb.
//! Validation failures come back as [`RobinError::BadRequest`] from the
//! async call.
//!
//! [`RequestClient`]: crate::api::RequestClient

use serde_json::Value;

use crate::errors::{Result, RobinError};

/// Declares a resource namespace borrowing the [`Api`](crate::api::Api)
macro_rules! resource {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            api: &'a crate::api::Api,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(api: &'a crate::api::Api) -> Self {
                Self { api }
            }
        }
    };
}

pub mod accounts;
pub mod apps;
pub mod auth;
pub mod channels;
pub mod device_manifests;
pub mod devices;
pub mod events;
pub mod identifiers;
pub mod locations;
pub mod me;
pub mod organizations;
pub mod spaces;

pub(crate) const ACCOUNTS: &str = "accounts";
pub(crate) const APPS: &str = "apps";
pub(crate) const AUTH: &str = "auth";
pub(crate) const AUTHORIZATIONS: &str = "authorizations";
pub(crate) const CHANNELS: &str = "channels";
pub(crate) const DATA: &str = "data";
pub(crate) const DEVICE_MANIFESTS: &str = "device-manifests";
pub(crate) const DEVICES: &str = "devices";
pub(crate) const EMAIL: &str = "email";
pub(crate) const EVENTS: &str = "events";
pub(crate) const FEEDS: &str = "feeds";
pub(crate) const IDENTIFIERS: &str = "identifiers";
pub(crate) const LOCATIONS: &str = "locations";
pub(crate) const MANAGERS: &str = "managers";
pub(crate) const ME: &str = "me";
pub(crate) const ORGANIZATIONS: &str = "organizations";
pub(crate) const PASSWORD: &str = "password";
pub(crate) const PRESENCE: &str = "presence";
pub(crate) const PROJECTS: &str = "projects";
pub(crate) const SPACES: &str = "spaces";
pub(crate) const TRIGGERS: &str = "triggers";
pub(crate) const USERS: &str = "users";

/// Fail with `message` unless every identifier is non-empty
pub(crate) fn require(identifiers: &[&str], message: &str) -> Result<()> {
    if identifiers.iter().any(|id| id.is_empty()) {
        return Err(RobinError::BadRequest(message.to_string()));
    }
    Ok(())
}

/// Fail with `message` when `data` is JSON null
pub(crate) fn require_data(data: &Value, message: &str) -> Result<()> {
    if data.is_null() {
        return Err(RobinError::BadRequest(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn require_rejects_any_empty_identifier() {
        assert!(require(&["a", "b"], "ids").is_ok());
        let err = require(&["a", ""], "A channel identifier is required.").unwrap_err();
        assert_eq!(err.to_string(), "Bad Request: A channel identifier is required.");
    }

    #[test]
    fn require_data_rejects_null_only() {
        assert!(require_data(&json!({}), "data").is_ok());
        assert!(require_data(&json!(0), "data").is_ok());
        assert!(require_data(&Value::Null, "data").is_err());
    }
}
