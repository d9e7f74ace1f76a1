use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fostertrack::{api, config, db};

#[derive(Parser)]
#[command(name = "fostertrack")]
#[command(about = "Foster cat records and daily care logs")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct StoreArgs {
    /// Database location: a directory, or :memory:
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Database name (file name inside the database directory)
    #[arg(long, env = "DATABASE_NAME", global = true)]
    database_name: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (the default)
    Serve,
    /// Connect to the database and print what it holds
    Check,
}

#[derive(Args)]
struct ServeArgs {
    /// Port for HTTP API
    #[arg(short, long, env = "PORT", default_value = "3000", global = true)]
    port: u16,

    /// Front-end directory served for non-API paths, if it exists
    #[arg(long, env = "STATIC_DIR", default_value = "public", global = true)]
    static_dir: PathBuf,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "fostertrack=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `.env` values back the `env =` flags.
    let env_file = config::load_dotenv(None);
    let cli = Cli::parse();
    init_tracing();
    if let Some(path) = env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let store_config = db::StoreConfig::new(cli.store.database_url, cli.store.database_name);
    let store = db::ConnectionManager::new(store_config);

    match cli.command {
        Some(Commands::Check) => check(store).await,
        Some(Commands::Serve) | None => serve(store, cli.serve).await,
    }
}

async fn serve(store: db::ConnectionManager, args: ServeArgs) -> anyhow::Result<()> {
    // Refuse to start without a working database.
    if let Err(e) = store.get_database().await {
        tracing::error!("Failed to start server because the database is not reachable: {}", e);
        return Err(e.into());
    }

    let mut app = api::create_router(store);
    if args.static_dir.is_dir() {
        tracing::info!("Serving front-end from {}", args.static_dir.display());
        app = api::with_static_dir(app, &args.static_dir);
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("FosterTrack API listening on http://localhost:{}", args.port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn check(store: db::ConnectionManager) -> anyhow::Result<()> {
    let db = store.get_database().await?;

    println!("Collections: {}", db.table_names()?.join(", "));

    let logs = db.list_all_logs()?;
    println!("Logs ({}):", logs.len());
    for log in logs {
        println!("{}", serde_json::to_string(&log)?);
    }

    Ok(())
}
