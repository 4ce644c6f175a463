//! Channel names, patterns and the `/<endpoint>/<identifier>/<type>` layout

use crate::errors::{Result, RobinError};

const DEFAULT_SYMBOLS: &str = ":-_!~()$@";

/// Which characters a channel segment may contain.
///
/// Segments always accept ASCII letters and digits. The default symbol set
/// adds `: - _ ! ~ ( ) $ @`, so URNs such as `urn:robin:device:12` are valid
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGrammar {
    symbols: String,
}

impl Default for ChannelGrammar {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.to_string(),
        }
    }
}

impl ChannelGrammar {
    /// A grammar accepting ASCII alphanumerics plus `symbols`
    pub fn with_symbols(symbols: impl Into<String>) -> Self {
        Self {
            symbols: symbols.into(),
        }
    }

    pub fn is_valid_segment(&self, segment: &str) -> bool {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || self.symbols.contains(c))
    }

    pub fn is_valid_name(&self, channel: &str) -> bool {
        match channel.strip_prefix('/') {
            Some(rest) => rest.split('/').all(|segment| self.is_valid_segment(segment)),
            None => false,
        }
    }

    /// A pattern is a name whose last segment is `*` or `**`
    pub fn is_valid_pattern(&self, pattern: &str) -> bool {
        let Some((head, last)) = pattern.rsplit_once('/') else {
            return false;
        };
        if last != "*" && last != "**" {
            return false;
        }
        head.is_empty() || self.is_valid_name(head)
    }

    pub fn validate_segment(&self, segment: &str) -> Result<()> {
        if self.is_valid_segment(segment) {
            Ok(())
        } else {
            Err(RobinError::InvalidChannel(segment.to_string()))
        }
    }

    pub fn validate_name(&self, channel: &str) -> Result<()> {
        if self.is_valid_name(channel) {
            Ok(())
        } else {
            Err(RobinError::InvalidChannel(channel.to_string()))
        }
    }

    /// Accepts a plain channel name or a wildcard pattern
    pub fn validate_subscription(&self, pattern: &str) -> Result<()> {
        if self.is_valid_name(pattern) || self.is_valid_pattern(pattern) {
            Ok(())
        } else {
            Err(RobinError::InvalidChannel(pattern.to_string()))
        }
    }
}

/// Whether `channel` is covered by the subscription `pattern`.
///
/// `*` matches exactly one trailing segment, `**` one or more.
pub fn matches(pattern: &str, channel: &str) -> bool {
    if pattern == channel {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return channel
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty());
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return channel
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'));
    }
    false
}

/// The three parts of a Grid channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelParts {
    pub endpoint: String,
    pub identifier: String,
    pub kind: String,
}

impl ChannelParts {
    /// Split `/<endpoint>/<identifier>/<type>`. Extra segments are ignored.
    pub fn parse(channel: &str) -> Result<Self> {
        let trimmed = channel.strip_prefix('/').unwrap_or(channel);
        let mut segments = trimmed.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(endpoint), Some(identifier), Some(kind))
                if !endpoint.is_empty() && !identifier.is_empty() && !kind.is_empty() =>
            {
                Ok(Self {
                    endpoint: endpoint.to_string(),
                    identifier: identifier.to_string(),
                    kind: kind.to_string(),
                })
            }
            _ => Err(RobinError::InvalidChannel(channel.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grammar_allows_urn_identifiers() {
        let grammar = ChannelGrammar::default();
        assert!(grammar.is_valid_name("/devices/urn:robin:device:12/data"));
        assert!(grammar.is_valid_name("/channels/a-b_c!~($)@/x"));
        assert!(!grammar.is_valid_name("devices/15"));
        assert!(!grammar.is_valid_name("/devices//data"));
        assert!(!grammar.is_valid_name("/devices/a b/data"));
    }

    #[test]
    fn custom_symbols_replace_the_default_set() {
        let grammar = ChannelGrammar::with_symbols("-");
        assert!(grammar.is_valid_name("/devices/a-b"));
        assert!(!grammar.is_valid_name("/devices/a:b"));
    }

    #[test]
    fn patterns_end_in_wildcards() {
        let grammar = ChannelGrammar::default();
        assert!(grammar.is_valid_pattern("/devices/15/*"));
        assert!(grammar.is_valid_pattern("/devices/**"));
        assert!(grammar.is_valid_pattern("/*"));
        assert!(!grammar.is_valid_pattern("/devices/*/data"));
        assert!(grammar.validate_subscription("/devices/15/data").is_ok());
        assert!(grammar.validate_subscription("/devices/1 5/*").is_err());
    }

    #[test]
    fn wildcard_matching() {
        assert!(matches("/devices/15/*", "/devices/15/data"));
        assert!(!matches("/devices/15/*", "/devices/15/data/x"));
        assert!(!matches("/devices/15/*", "/devices/150/data"));
        assert!(matches("/devices/**", "/devices/15/data/x"));
        assert!(!matches("/devices/**", "/devices"));
        assert!(matches("/devices/15/data", "/devices/15/data"));
    }

    #[test]
    fn parses_channel_parts() {
        let parts = ChannelParts::parse("/devices/42/data").unwrap();
        assert_eq!(parts.endpoint, "devices");
        assert_eq!(parts.identifier, "42");
        assert_eq!(parts.kind, "data");
        assert!(ChannelParts::parse("/devices/42").is_err());
    }
}
