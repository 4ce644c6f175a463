//! Prints who is checked into a space, then follows a device on the Grid
//!
//! Configuration comes from `ROBIN_CONFIG_PATH` and the `ROBIN_*`
//! environment variables. Usage:
//!
//! ```text
//! ROBIN_ACCESS_TOKEN=... cargo run --example space_presence -- <space id> [device id]
//! ```

use anyhow::{bail, Context, Result};
use robin_sdk::{Robin, RobinConfig};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "robin_sdk=debug,space_presence=info".into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(space) = args.next() else {
        bail!("usage: space_presence <space id> [device id]");
    };
    let device = args.next();

    let config = RobinConfig::load()?;
    let robin = Robin::from_config(&config).context("creating the Robin client")?;

    let presence = robin.api().spaces().presence().get(&space, None).await?;
    info!("{} people in space {}", presence.data_len(), space);
    if let Some(entries) = presence.data().as_array() {
        for entry in entries {
            let email = entry["user"]["primary_email"]["email"].as_str().unwrap_or("unknown");
            println!("{}", email);
        }
    }

    let Some(device) = device else {
        return Ok(());
    };

    let connection = robin.grid().devices().connect(&device)?;
    let mut data = connection.on("data");
    connection.listen().await?;
    info!("Following device {}, press Ctrl-C to stop", device);

    loop {
        tokio::select! {
            message = data.recv() => match message {
                Ok(payload) => println!("{}", payload),
                Err(RecvError::Lagged(missed)) => warn!("Missed {} device messages", missed),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    connection.stop().await?;
    Ok(())
}
