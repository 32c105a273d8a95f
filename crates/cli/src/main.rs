use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::MenuCommand;
use common::{init_structured_logging, ConfigLoader, RequestContext};
use std::path::PathBuf;
use tracing::{debug, Instrument};

#[derive(Parser)]
#[command(name = "slms")]
#[command(about = "SLMS - System for Lightweight Management of Services, admin tools")]
#[command(version)]
struct Cli {
    /// Файл базы SQLite (перекрывает конфигурацию)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Файл конфигурации (TOML или JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// [☰] Управление деревом меню навигации
    Menu(MenuCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_path(path);
    }
    let mut config = loader.load().await?;
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }

    init_structured_logging(config.logging_config())?;

    let ctx = RequestContext::new();
    debug!(request_id = %ctx.request_id, db = %config.database_path().display(), "Starting request");

    match cli.command {
        Commands::Menu(cmd) => cmd.execute(&config).instrument(ctx.span()).await,
    }
}
