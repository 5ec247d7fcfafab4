// CLI module: process entry commands

pub mod seed;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use poem::{Server, listener::TcpListener};

use crate::app_data::AppData;
use crate::config::{Settings, database};
use crate::types::internal::context::RequestContext;

/// Helpdesk ticketing backend
#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "IT helpdesk ticketing backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Initialize the database and start the HTTP server (default)
    Serve,

    /// Run migrations and seed default accounts, then exit
    Init,
}

/// Connect, migrate and seed
///
/// A seeding failure is logged and does not stop startup.
pub async fn initialize(settings: &Settings) -> Result<Arc<AppData>, Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = database::connect(settings.database_url()).await?;

    tracing::info!("Running migrations...");
    database::migrate(&db).await?;

    let app_data = Arc::new(AppData::init(db, settings)?);

    let ctx = RequestContext::for_cli("init");
    if let Err(e) = seed::seed_default_accounts(
        &ctx,
        &app_data.db,
        &app_data.user_store,
        &app_data.crypto_provider,
    )
    .await
    {
        tracing::error!("Error creating default users: {}", e);
    }

    Ok(app_data)
}

/// Execute the parsed command
pub async fn execute_command(cli: Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let command = cli.command.unwrap_or(Commands::Serve);
    let app_data = initialize(settings).await?;

    match command {
        Commands::Init => {
            tracing::info!("Initialization complete");
        }
        Commands::Serve => serve(app_data, settings).await?,
    }

    Ok(())
}

async fn serve(app_data: Arc<AppData>, settings: &Settings) -> Result<(), std::io::Error> {
    let address = settings.server_address();
    let server_url = format!("http://localhost:{}/api", settings.server_port());
    let app = crate::api::build_route(app_data, &server_url);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger", settings.server_port());

    Server::new(TcpListener::bind(address)).run(app).await
}
