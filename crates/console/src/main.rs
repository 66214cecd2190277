//! `vulink-console` -- admin console core for the apilink backend.
//!
//! Boots the console against a running backend, performs a full catalog
//! refresh, and logs what it found. Rendering is left to an embedding UI;
//! run standalone this doubles as a connectivity smoke check.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default                 | Description          |
//! |-----------------------|----------|-------------------------|----------------------|
//! | `VULINK_API_URL`      | no       | `http://localhost:5341` | Backend base URL     |
//! | `VULINK_TIMEOUT_SECS` | no       | `30`                    | Per-request timeout  |

use vulink_client::{ClientConfig, LinkApi};
use vulink_console::LinkConsole;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vulink=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();

    tracing::info!(
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        "Starting vulink-console",
    );

    let console = LinkConsole::new(LinkApi::new(config));

    match console.refresh().await {
        Ok(status) => {
            let snapshot = console.catalog().snapshot().await;
            tracing::info!(
                links = snapshot.links.len(),
                images = snapshot.images.len(),
                ?status,
                "Catalog loaded",
            );

            for link in &snapshot.links {
                tracing::info!(
                    file = %link.file,
                    name = %link.name,
                    enabled = link.enabled,
                    period_secs = link.update_period,
                    "Link",
                );
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Initial catalog refresh failed");
            std::process::exit(1);
        }
    }
}
