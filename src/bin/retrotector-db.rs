//! retrotector-db CLI: load one RetroTector JSON document into SQLite.
//!
//! Usage:
//!   retrotector-db --input run.json [--db path]

use clap::Parser;
use retrotector_db::{Document, LoadError, LoadReport, Loader, OpenStore, SqliteStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "retrotector-db",
    version,
    about = "Parse RetroTector JSON output and insert it into the database"
)]
struct Cli {
    /// Path to the input JSON file
    #[arg(long)]
    input: PathBuf,
    /// Path to SQLite database file
    #[arg(long, env = "RETROTECTOR_DB")]
    db: Option<PathBuf>,
}

/// Get the default database path (~/.local/share/retrotector-db/retrotector.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("retrotector-db").join("retrotector.db")
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_file(store: &SqliteStore, input: &Path) -> Result<LoadReport, LoadError> {
    let document = Document::from_path(input)?;
    Loader::new(store).load(&document)
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    println!("Loading: {}", cli.input.display());

    let db_path = cli.db.unwrap_or_else(default_db_path);
    let store = match SqliteStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            println!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("Connected to DB");

    let code = match load_file(&store, &cli.input) {
        Ok(report) => {
            println!("Loaded {}", report);
            0
        }
        Err(e) => {
            println!("Error: {}", e);
            1
        }
    };

    if let Err(e) = store.close() {
        tracing::warn!(error = %e, "closing the database reported an error");
    }
    println!("DB connection closed");

    std::process::exit(code);
}
