//! The Bayeux transport against a small fake Grid server

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use robin_sdk::{Credentials, Grid, TransportEvent};
use serde_json::{json, Value};
use tokio::{sync::Mutex, time::timeout};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct FakeGrid {
    pending: Mutex<Vec<Value>>,
    received: Mutex<Vec<Value>>,
    fail_connect: AtomicBool,
    /// Queued for delivery as soon as a subscribe arrives, ahead of its reply
    on_subscribe: Mutex<Option<Value>>,
    echo_publishes: AtomicBool,
}

impl FakeGrid {
    async fn received_on(&self, channel: &str) -> Vec<Value> {
        self.received
            .lock()
            .await
            .iter()
            .filter(|message| message["channel"] == channel)
            .cloned()
            .collect()
    }
}

async fn bayeux(
    State(grid): State<Arc<FakeGrid>>,
    Json(messages): Json<Vec<Value>>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let mut replies = Vec::new();

    for message in messages {
        grid.received.lock().await.push(message.clone());
        let channel = message["channel"].as_str().unwrap_or_default().to_string();
        let id = message["id"].clone();

        match channel.as_str() {
            "/meta/handshake" => replies.push(json!({
                "channel": channel,
                "id": id,
                "successful": true,
                "clientId": "client-1",
                "version": "1.0",
                "supportedConnectionTypes": ["long-polling"],
                "advice": {"reconnect": "retry", "interval": 100, "timeout": 1000}
            })),
            "/meta/connect" => {
                if grid.fail_connect.load(Ordering::SeqCst) {
                    return Err(StatusCode::INTERNAL_SERVER_ERROR);
                }
                for _ in 0..20 {
                    if !grid.pending.lock().await.is_empty() {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
                replies.push(json!({"channel": channel, "id": id, "successful": true}));
                replies.extend(grid.pending.lock().await.drain(..));
            }
            "/meta/subscribe" => {
                if let Some(queued) = grid.on_subscribe.lock().await.take() {
                    grid.pending.lock().await.push(queued);
                    tokio::time::sleep(Duration::from_millis(150)).await;
                }
                replies.push(json!({
                    "channel": channel,
                    "id": id,
                    "successful": true,
                    "subscription": message["subscription"]
                }));
            }
            "/meta/unsubscribe" => replies.push(json!({
                "channel": channel,
                "id": id,
                "successful": true,
                "subscription": message["subscription"]
            })),
            _ => {
                if grid.echo_publishes.load(Ordering::SeqCst) {
                    replies.push(json!({"channel": channel, "data": message["data"]}));
                }
                replies.push(json!({"channel": channel, "id": id, "successful": true}));
            }
        }
    }

    Ok(Json(replies))
}

async fn start_fake_grid() -> (Arc<FakeGrid>, String) {
    let grid = Arc::new(FakeGrid::default());
    let app = Router::new()
        .route("/grid", post(bayeux))
        .with_state(grid.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (grid, format!("http://{}/grid", addr))
}

fn robin_grid(url: &str) -> Grid {
    let credentials = Arc::new(Credentials::new("foo"));
    Grid::new(credentials, url).unwrap()
}

#[tokio::test]
async fn receives_device_messages() {
    let (fake, url) = start_fake_grid().await;
    let grid = robin_grid(&url);

    let connection = grid.devices().connect("42").unwrap();
    let mut data = connection.on("data");
    connection.listen().await.unwrap();

    fake.pending
        .lock()
        .await
        .push(json!({"channel": "/devices/42/data", "data": {"foo": "bar"}}));

    let payload = timeout(WAIT, data.recv()).await.unwrap().unwrap();
    assert_eq!(payload, json!({"foo": "bar"}));

    let handshakes = fake.received_on("/meta/handshake").await;
    assert_eq!(handshakes[0]["ext"]["accessToken"], "foo");
    let subscribes = fake.received_on("/meta/subscribe").await;
    assert_eq!(subscribes[0]["subscription"], "/devices/42/*");
    assert_eq!(subscribes[0]["clientId"], "client-1");
}

#[tokio::test]
async fn publishes_with_credentials() {
    let (fake, url) = start_fake_grid().await;
    let grid = robin_grid(&url);

    let connection = grid.channels().connect("7").unwrap();
    connection.send("command", json!({"open": true})).await.unwrap();

    let published = fake.received_on("/channels/7/command").await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0]["data"], json!({"open": true}));
    assert_eq!(published[0]["ext"]["accessToken"], "foo");
    assert_eq!(published[0]["clientId"], "client-1");
}

#[tokio::test]
async fn stop_unsubscribes() {
    let (fake, url) = start_fake_grid().await;
    let grid = robin_grid(&url);

    let connection = grid.devices().connect("42").unwrap();
    connection.listen().await.unwrap();
    connection.stop().await.unwrap();

    let unsubscribes = fake.received_on("/meta/unsubscribe").await;
    assert_eq!(unsubscribes.len(), 1);
    assert_eq!(unsubscribes[0]["subscription"], "/devices/42/*");
}

#[tokio::test]
async fn failed_polls_report_the_transport_down() {
    let (fake, url) = start_fake_grid().await;
    let grid = robin_grid(&url);
    let mut events = grid.events();

    let connection = grid.devices().connect("42").unwrap();
    connection.listen().await.unwrap();
    assert_eq!(timeout(WAIT, events.recv()).await.unwrap().unwrap(), TransportEvent::Up);

    fake.fail_connect.store(true, Ordering::SeqCst);
    assert_eq!(timeout(WAIT, events.recv()).await.unwrap().unwrap(), TransportEvent::Down);
}

#[tokio::test]
async fn messages_polled_before_the_subscribe_reply_are_delivered() {
    let (fake, url) = start_fake_grid().await;
    *fake.on_subscribe.lock().await =
        Some(json!({"channel": "/devices/42/data", "data": {"foo": "bar"}}));
    let grid = robin_grid(&url);

    let connection = grid.devices().connect("42").unwrap();
    let mut data = connection.on("data");
    connection.listen().await.unwrap();

    let payload = timeout(WAIT, data.recv()).await.unwrap().unwrap();
    assert_eq!(payload, json!({"foo": "bar"}));
}

#[tokio::test]
async fn data_piggybacked_on_a_publish_reply_is_dispatched() {
    let (fake, url) = start_fake_grid().await;
    fake.echo_publishes.store(true, Ordering::SeqCst);
    let grid = robin_grid(&url);

    let connection = grid.channels().connect("7").unwrap();
    let mut commands = connection.on("command");
    connection.listen().await.unwrap();

    connection.send("command", json!({"open": true})).await.unwrap();

    let payload = timeout(WAIT, commands.recv()).await.unwrap().unwrap();
    assert_eq!(payload, json!({"open": true}));
}
