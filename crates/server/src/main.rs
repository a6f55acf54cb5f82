//! Crop Server - serves the recommendation form and JSON API.
//!
//! Exits non-zero if configuration is invalid or the model artifact cannot be
//! loaded.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
