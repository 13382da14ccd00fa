use anyhow::{Context, Result};
use application::accounts::SeedOutcome;
use clap::{Parser, Subcommand};
use infrastructure::AppConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api_server::{api, setup_app_state};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.toml and the run-mode overrides
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override server.host
    #[arg(long)]
    host: Option<String>,

    /// Override server.port
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Create the first admin account
    SeedAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "Administrator")]
        full_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,api_server=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(&args.config_dir).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!("Connecting to database...");
    let db = infrastructure::database::connect(
        &config.database.url,
        config.database.max_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!("✅ Database ready");

    let state = setup_app_state(&config, db)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let app = api::create_router(state);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("🚀 API Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Command::SeedAdmin {
            email,
            password,
            full_name,
        } => match state
            .accounts
            .seed_admin(&email, &password, &full_name)
            .await?
        {
            SeedOutcome::Created(id) => info!(user_id = %id, "Admin account created"),
            SeedOutcome::AlreadyExists(id) => info!(user_id = %id, "Admin account already exists"),
        },
    }

    Ok(())
}
