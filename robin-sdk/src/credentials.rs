use std::fmt;

use parking_lot::RwLock;

/// Authentication state shared by the HTTP and Grid layers
#[derive(Default)]
pub struct Credentials {
    access_token: String,
    relay_identifier: RwLock<Option<String>>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            relay_identifier: RwLock::new(None),
        }
    }

    /// The access token, or None when it is empty
    pub fn access_token(&self) -> Option<&str> {
        Some(self.access_token.as_str()).filter(|token| !token.is_empty())
    }

    pub fn relay_identifier(&self) -> Option<String> {
        self.relay_identifier.read().clone()
    }

    /// Set the relay identifier. An empty value leaves the current one in place.
    pub fn set_relay_identifier(&self, relay_identifier: impl Into<String>) {
        let relay_identifier = relay_identifier.into();
        if relay_identifier.is_empty() {
            return;
        }
        *self.relay_identifier.write() = Some(relay_identifier);
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("relay_identifier", &self.relay_identifier())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_reads_as_missing() {
        assert_eq!(Credentials::new("").access_token(), None);
        assert_eq!(Credentials::new("foo").access_token(), Some("foo"));
    }

    #[test]
    fn relay_identifier_ignores_empty_values() {
        let credentials = Credentials::new("foo");
        assert_eq!(credentials.relay_identifier(), None);
        credentials.set_relay_identifier("bar");
        credentials.set_relay_identifier("");
        assert_eq!(credentials.relay_identifier().as_deref(), Some("bar"));
    }
}
