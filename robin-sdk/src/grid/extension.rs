use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::{channel::ChannelParts, message::Message};
use crate::credentials::Credentials;

/// Hook run on every message a transport sends or receives
pub trait Extension: Send + Sync {
    fn incoming(&self, message: Message) -> Message {
        message
    }

    fn outgoing(&self, message: Message) -> Message {
        message
    }
}

/// Authenticates outgoing messages and annotates incoming data with the
/// parts of the channel it arrived on.
#[derive(Debug)]
pub struct AuthExtension {
    credentials: Arc<Credentials>,
}

impl AuthExtension {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self { credentials }
    }
}

impl Extension for AuthExtension {
    fn incoming(&self, mut message: Message) -> Message {
        let Some(data) = message.data.take() else {
            return message;
        };
        if data.is_null() {
            message.data = Some(data);
            return message;
        }

        match ChannelParts::parse(&message.channel) {
            Ok(parts) => {
                message.data = Some(json!({
                    "data": data,
                    "ext": {
                        "channel": message.channel,
                        "endpoint": parts.endpoint,
                        "identifier": parts.identifier,
                        "type": parts.kind,
                    }
                }));
            }
            Err(e) => {
                debug!("Could not interpret incoming message: {}", e);
                message.data = Some(data);
                message.error = Some(e.to_string());
            }
        }
        message
    }

    fn outgoing(&self, mut message: Message) -> Message {
        let access_token = self.credentials.access_token().map(str::to_string);
        let relay_identifier = self.credentials.relay_identifier();
        let ext = message.ext_mut();
        ext.insert(
            "accessToken".to_string(),
            access_token.map(Value::String).unwrap_or(Value::Null),
        );
        ext.insert(
            "relayIdentifier".to_string(),
            relay_identifier.map(Value::String).unwrap_or(Value::Null),
        );
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extension() -> AuthExtension {
        let credentials = Arc::new(Credentials::new("foo"));
        credentials.set_relay_identifier("relay-1");
        AuthExtension::new(credentials)
    }

    #[test]
    fn outgoing_carries_credentials() {
        let message = extension().outgoing(Message::publish("/devices/15/data", json!(1)));
        let ext = message.ext.unwrap();
        assert_eq!(ext["accessToken"], "foo");
        assert_eq!(ext["relayIdentifier"], "relay-1");
    }

    #[test]
    fn outgoing_keeps_existing_ext_members() {
        let mut message = Message::new("/meta/connect");
        message.ext_mut().insert("ack".to_string(), json!(true));
        let message = extension().outgoing(message);
        assert_eq!(message.ext.unwrap()["ack"], true);
    }

    #[test]
    fn incoming_wraps_data_with_channel_parts() {
        let message = extension().incoming(Message::publish("/devices/42/data", json!({"foo": "bar"})));
        assert_eq!(
            message.data.unwrap(),
            json!({
                "data": {"foo": "bar"},
                "ext": {"channel": "/devices/42/data", "endpoint": "devices", "identifier": "42", "type": "data"}
            })
        );
        assert!(message.error.is_none());
    }

    #[test]
    fn incoming_marks_unparseable_channels() {
        let message = extension().incoming(Message::publish("/devices", json!({"foo": "bar"})));
        assert!(message.error.is_some());
        assert_eq!(message.data.unwrap(), json!({"foo": "bar"}));
    }

    #[test]
    fn incoming_leaves_meta_replies_alone() {
        let mut reply = Message::new("/meta/connect");
        reply.successful = Some(true);
        let message = extension().incoming(reply.clone());
        assert_eq!(message, reply);
    }
}
