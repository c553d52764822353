//! Catalog Terminal Client

use std::{process, sync::Arc};

use serde::Serialize;
use thiserror::Error;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catalog_client::{
    api::{ApiClient, ApiError},
    app::CatalogClient,
    config::{ClientConfig, Command, ConfigError},
    notification::NotificationQueue,
    push::{PushConnection, PushError},
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error(transparent)]
    Push(#[from] PushError),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
pub async fn main() {
    let config = ClientConfig::load().unwrap_or_else(|error| {
        if !error.use_stderr() {
            error.exit();
        }

        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {error}");
        }

        process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(config).await {
        #[expect(
            clippy::print_stderr,
            reason = "command failures are reported to the terminal user"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}

async fn run(config: ClientConfig) -> Result<(), CliError> {
    let push_url = config.push_url()?;

    let client = Arc::new(CatalogClient::new(
        Arc::new(ApiClient::new(&config.api_url)),
        NotificationQueue::spawn(),
    ));

    match config.command {
        Command::List => print_json(&client.fetch_products().await?),
        Command::Get { id } => print_json(&client.fetch_product(id).await?),
        Command::Create(fields) => {
            let connection = announce_through(&client, &push_url).await;
            let created = client.create_product(fields.into()).await;

            finish(connection).await;
            print_json(&created?)
        }
        Command::Update { id, fields } => {
            let connection = announce_through(&client, &push_url).await;
            let updated = client.update_product(id, fields.into()).await;

            finish(connection).await;
            print_json(&updated?)
        }
        Command::Delete { id } => {
            let connection = announce_through(&client, &push_url).await;
            let deleted = client.delete_product(id).await;

            finish(connection).await;
            print_json(&serde_json::json!({ "deleted": deleted? }))
        }
        Command::Watch => watch(client, &push_url).await,
    }
}

/// Open the push channel so a mutation can be announced. Failing to connect
/// only costs the announcement.
async fn announce_through(client: &Arc<CatalogClient>, push_url: &str) -> Option<PushConnection> {
    match PushConnection::connect(push_url, client.clone()).await {
        Ok(connection) => {
            client.set_publisher(Arc::new(connection.publisher())).await;

            Some(connection)
        }
        Err(error) => {
            warn!(push_url, "change will not be announced: {error}");

            None
        }
    }
}

async fn finish(connection: Option<PushConnection>) {
    if let Some(connection) = connection {
        connection.close().await;
    }
}

async fn watch(client: Arc<CatalogClient>, push_url: &str) -> Result<(), CliError> {
    let connection = PushConnection::connect(push_url, client.clone()).await?;

    client.set_publisher(Arc::new(connection.publisher())).await;

    let products = client.fetch_products().await?;

    info!(count = products.len(), "watching product catalog");

    let mut notifications = client.notifications().subscribe();
    let closed = connection.closed();

    tokio::pin!(closed);

    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                if let Err(error) = result {
                    warn!("failed to listen for Ctrl+C: {error}");
                }
                break;
            }
            () = &mut closed => break,
            changed = notifications.changed() => {
                if changed.is_err() {
                    break;
                }

                let current = notifications.borrow_and_update().clone();

                if let Some(notification) = current {
                    #[expect(
                        clippy::print_stdout,
                        reason = "watch mode streams notifications to the terminal"
                    )]
                    {
                        println!("[{}] {}", notification.severity, notification.message);
                    }
                }
            }
        }
    }

    Ok(())
}

#[expect(clippy::print_stdout, reason = "command output goes to stdout")]
fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}
