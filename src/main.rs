use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webhook_intake::adapters::PostgresTransactionRepository;
use webhook_intake::cli::{self, Cli, Commands, DbCommands, TxCommands};
use webhook_intake::config::{Config, LogFormat};
use webhook_intake::services::PROCESSING_DELAY;
use webhook_intake::{create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    let config = Config::from_env();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config?).await,
        Commands::Tx(TxCommands::Show { transaction_id }) => {
            let pool = db::create_pool(&config?).await?;
            cli::handle_tx_show(&pool, &transaction_id).await
        }
        Commands::Db(DbCommands::Migrate) => {
            let pool = db::create_pool(&config?).await?;
            cli::handle_db_migrate(&pool).await
        }
        Commands::Config => cli::handle_config_validate(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let repository = Arc::new(PostgresTransactionRepository::new(pool));
    let app = create_app(AppState::new(repository, PROCESSING_DELAY));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received; pending deferred tasks are dropped");
}
