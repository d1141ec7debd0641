use anyhow::{Context, Result};
use roster_server::config::{LoggingConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging before loading the rest of the configuration
    roster_server::init_logging(&LoggingConfig::from_env());

    // Load configuration from environment variables
    let config = ServerConfig::load().context("Failed to load configuration")?;

    // Run the server using the library's run function
    roster_server::run(config).await.context("Server error")?;

    Ok(())
}
