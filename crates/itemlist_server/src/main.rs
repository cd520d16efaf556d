//! Binary entrypoint for the item list HTTP server.

use clap::Parser;
use itemlist_server::ServerConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "itemlist-server", about = "Paginated, reorderable item list server")]
struct Cli {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP listen port
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// SQLite file for the persisted order
    #[arg(long, default_value = "itemlist.sqlite3", conflicts_with = "ephemeral")]
    db_path: PathBuf,

    /// Keep the order in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Number of synthetic catalog items
    #[arg(long, default_value_t = itemlist_core::DEFAULT_CATALOG_SIZE)]
    catalog_size: usize,

    /// Seed for the synthetic catalog
    #[arg(long, default_value_t = itemlist_core::DEFAULT_SEED)]
    seed: u64,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, default_value = itemlist_core::default_log_level())]
    log_level: String,

    /// Absolute directory for rolling log files (stderr when omitted)
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        db_path: (!cli.ephemeral).then_some(cli.db_path),
        catalog_size: cli.catalog_size,
        seed: cli.seed,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
    };

    if let Err(err) = itemlist_server::init_logging(&config) {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }

    if let Err(err) = itemlist_server::run(config).await {
        log::error!("event=server_exit module=server status=error error={err}");
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}
