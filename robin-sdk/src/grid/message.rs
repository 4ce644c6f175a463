use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const META_HANDSHAKE: &str = "/meta/handshake";
pub const META_CONNECT: &str = "/meta/connect";
pub const META_SUBSCRIBE: &str = "/meta/subscribe";
pub const META_UNSUBSCRIBE: &str = "/meta/unsubscribe";

/// One Bayeux message, as exchanged with the Grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub channel: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful: Option<bool>,

    /// Set by the server on failed meta replies, or by an incoming extension
    /// that could not interpret the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<Advice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_connection_types: Option<Vec<String>>,
}

impl Message {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        }
    }

    /// A data message for `channel`
    pub fn publish(channel: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::new(channel)
        }
    }

    pub fn is_meta(&self) -> bool {
        self.channel.starts_with("/meta/")
    }

    pub fn is_successful(&self) -> bool {
        self.successful.unwrap_or(false)
    }

    /// The `ext` object, created empty when missing
    pub fn ext_mut(&mut self) -> &mut Map<String, Value> {
        self.ext.get_or_insert_with(Map::new)
    }
}

/// Server reconnect advice carried by meta replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect: Option<Reconnect>,

    /// Milliseconds to wait before the next connect or handshake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Milliseconds the server may hold a connect request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reconnect {
    Retry,
    Handshake,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case_and_skips_empty_fields() {
        let mut message = Message::publish("/devices/15/data", json!({"foo": "bar"}));
        message.client_id = Some("abc".to_string());
        message.id = None;

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({"channel": "/devices/15/data", "clientId": "abc", "data": {"foo": "bar"}})
        );
    }

    #[test]
    fn reads_server_replies() {
        let reply: Message = serde_json::from_value(json!({
            "channel": "/meta/handshake",
            "successful": true,
            "clientId": "xyz",
            "version": "1.0",
            "supportedConnectionTypes": ["long-polling"],
            "advice": {"reconnect": "retry", "interval": 0, "timeout": 45000}
        }))
        .unwrap();

        assert!(reply.is_meta());
        assert!(reply.is_successful());
        assert_eq!(reply.client_id.as_deref(), Some("xyz"));
        assert_eq!(reply.advice.unwrap().reconnect, Some(Reconnect::Retry));
    }
}
