//! Connections over the in-process transport

use std::{sync::Arc, time::Duration};

use assert_matches::assert_matches;
use futures_util::StreamExt;
use robin_sdk::{
    grid::Message, Credentials, Grid, GridOptions, MemoryTransport, RobinError, TransportEvent,
};
use serde_json::json;
use tokio::time::timeout;
use tokio_test::{assert_err, assert_ok};

const WAIT: Duration = Duration::from_secs(2);

fn grid_with(transport: Arc<MemoryTransport>) -> Grid {
    let credentials = Arc::new(Credentials::new("foo"));
    credentials.set_relay_identifier("relay-1");
    Grid::with_transport(credentials, transport, GridOptions::default())
}

#[tokio::test]
async fn device_data_is_emitted_with_the_original_payload() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());

    let connection = grid.devices().connect("42").unwrap();
    let mut data = connection.on("data");
    connection.listen().await.unwrap();

    assert_eq!(transport.deliver(Message::publish("/devices/42/data", json!({"foo": "bar"}))), 1);

    let payload = timeout(WAIT, data.recv()).await.unwrap().unwrap();
    assert_eq!(payload, json!({"foo": "bar"}));
}

#[tokio::test]
async fn messages_are_routed_by_type() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());

    let connection = grid.channels().connect("7").unwrap();
    let mut alerts = connection.stream("alert");
    let mut data = connection.on("data");
    connection.listen().await.unwrap();

    transport.deliver(Message::publish("/channels/7/alert", json!({"level": 2})));
    transport.deliver(Message::publish("/channels/8/alert", json!({"level": 9})));

    let alert = timeout(WAIT, alerts.next()).await.unwrap().unwrap();
    assert_eq!(alert, json!({"level": 2}));
    assert!(data.try_recv().is_err());
}

#[tokio::test]
async fn connect_validates_identifiers() {
    let grid = grid_with(Arc::new(MemoryTransport::new()));

    assert_matches!(grid.devices().connect(""), Err(RobinError::BadRequest(_)));
    assert_matches!(grid.devices().connect("a/b"), Err(RobinError::InvalidChannel(_)));

    let connection = grid.devices().connect("15").unwrap();
    assert_eq!(connection.stub(), "/devices/15");
    assert_eq!(connection.identifier(), "15");
}

#[tokio::test]
async fn stop_without_listen_fails() {
    let grid = grid_with(Arc::new(MemoryTransport::new()));
    let connection = grid.devices().connect("15").unwrap();

    let err = connection.stop().await.unwrap_err();
    assert_matches!(err, RobinError::NoConnection);
    assert_eq!(err.to_string(), "No connection found");
}

#[tokio::test]
async fn stop_cancels_the_subscription() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());
    let connection = grid.devices().connect("15").unwrap();

    assert_ok!(connection.listen().await);
    assert_eq!(transport.subscriber_count(), 1);

    assert_ok!(connection.stop().await);
    assert_eq!(transport.subscriber_count(), 0);
    assert_eq!(transport.deliver(Message::publish("/devices/15/data", json!(1))), 0);
    assert_err!(connection.stop().await);
}

#[tokio::test]
async fn listening_again_replaces_the_subscription() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());
    let connection = grid.devices().connect("15").unwrap();
    let mut data = connection.on("data");

    assert_ok!(connection.listen().await);
    assert_ok!(connection.listen().await);
    assert_eq!(transport.subscriber_count(), 1);

    transport.deliver(Message::publish("/devices/15/data", json!("once")));
    assert_eq!(timeout(WAIT, data.recv()).await.unwrap().unwrap(), json!("once"));
    assert!(timeout(Duration::from_millis(100), data.recv()).await.is_err());
}

#[tokio::test]
async fn send_publishes_authenticated_messages() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());
    let connection = grid.devices().connect("15").unwrap();

    connection.send("command", json!({"reboot": true})).await.unwrap();

    let published = transport.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].channel, "/devices/15/command");
    assert_eq!(published[0].data, Some(json!({"reboot": true})));
    let ext = published[0].ext.as_ref().unwrap();
    assert_eq!(ext["accessToken"], "foo");
    assert_eq!(ext["relayIdentifier"], "relay-1");
}

#[tokio::test]
async fn sent_messages_reach_listeners_of_the_same_entity() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());

    let listener = grid.devices().connect("15").unwrap();
    let mut pings = listener.on("ping");
    listener.listen().await.unwrap();

    let sender = grid.devices().connect("15").unwrap();
    sender.send("ping", json!({"n": 1})).await.unwrap();

    assert_eq!(timeout(WAIT, pings.recv()).await.unwrap().unwrap(), json!({"n": 1}));
}

#[tokio::test]
async fn malformed_messages_do_not_end_the_stream() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());
    let connection = grid.devices().connect("15").unwrap();
    let mut data = connection.on("data");
    connection.listen().await.unwrap();

    let mut broken = Message::publish("/devices/15/data", json!("bad"));
    broken.error = Some("corrupt".to_string());
    transport.deliver(broken);
    transport.deliver(Message::publish("/devices/15/data", json!("good")));

    assert_eq!(timeout(WAIT, data.recv()).await.unwrap().unwrap(), json!("good"));
}

#[tokio::test]
async fn transport_state_is_observable() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());
    let mut events = grid.events();

    transport.set_down();
    assert_eq!(timeout(WAIT, events.recv()).await.unwrap().unwrap(), TransportEvent::Down);
}

#[tokio::test]
async fn dropping_a_listening_connection_unsubscribes() {
    let transport = Arc::new(MemoryTransport::new());
    let grid = grid_with(transport.clone());

    let connection = grid.devices().connect("15").unwrap();
    assert_ok!(connection.listen().await);
    assert_eq!(transport.subscriber_count(), 1);

    drop(connection);
    timeout(WAIT, async {
        while transport.subscriber_count() > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
}
