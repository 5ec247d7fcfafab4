use clap::Parser;

use helpdesk_backend::cli::{self, Cli};
use helpdesk_backend::config::{Settings, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    cli::execute_command(cli, &settings).await
}
