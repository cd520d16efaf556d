//! HTTP surface for the item list engine.
//!
//! # Responsibility
//! - Build the process-scoped stores once at startup.
//! - Serve paging, ordering and selection endpoints over axum.
//!
//! # Invariants
//! - Ledger and selection writes run under their own mutex, so a replace or
//!   splice is atomic with respect to concurrent requests.

pub mod error;
pub mod http;

use crate::error::StartupError;
use itemlist_core::db::{open_db, open_db_in_memory};
use itemlist_core::{
    generate_catalog, CatalogStore, OrderLedger, SelectionSet, SqliteOrderRepository,
    DEFAULT_CATALOG_SIZE, DEFAULT_SEED,
};
use log::info;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Ledger type held by the server.
pub type SharedLedger = Arc<Mutex<OrderLedger<SqliteOrderRepository>>>;
/// Selection type held by the server.
pub type SharedSelection = Arc<Mutex<SelectionSet>>;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// HTTP listen port.
    pub port: u16,
    /// SQLite file holding the persisted order. `None` keeps it in memory.
    pub db_path: Option<PathBuf>,
    /// Number of synthetic items to generate.
    pub catalog_size: usize,
    /// Seed for the synthetic catalog.
    pub seed: u64,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory; stderr when unset.
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            db_path: Some(PathBuf::from("itemlist.sqlite3")),
            catalog_size: DEFAULT_CATALOG_SIZE,
            seed: DEFAULT_SEED,
            log_level: itemlist_core::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Process-scoped stores shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub ledger: SharedLedger,
    pub selection: SharedSelection,
}

impl AppState {
    /// Wraps already-built stores.
    pub fn new(catalog: CatalogStore, ledger: OrderLedger<SqliteOrderRepository>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            ledger: Arc::new(Mutex::new(ledger)),
            selection: Arc::new(Mutex::new(SelectionSet::new())),
        }
    }

    /// Generates the catalog, opens storage and loads the ledger.
    pub fn open(config: &ServerConfig) -> Result<Self, StartupError> {
        let started_at = Instant::now();
        let catalog = CatalogStore::try_new(generate_catalog(config.catalog_size, config.seed))?;
        info!(
            "event=catalog_build module=server status=ok items={} duration_ms={}",
            catalog.len(),
            started_at.elapsed().as_millis()
        );

        let conn = match &config.db_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty())
                {
                    std::fs::create_dir_all(parent)?;
                }
                open_db(path)?
            }
            None => open_db_in_memory()?,
        };
        let repo = SqliteOrderRepository::try_new(conn)?;
        let ledger = OrderLedger::load(repo, &catalog);

        Ok(Self::new(catalog, ledger))
    }
}

/// Starts the `log` backend for this process from `config`.
pub fn init_logging(config: &ServerConfig) -> Result<(), StartupError> {
    itemlist_core::init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(StartupError::Logging)
}

/// Builds state and serves HTTP until shutdown.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let build_config = config.clone();
    let state = tokio::task::spawn_blocking(move || AppState::open(&build_config))
        .await
        .map_err(|err| StartupError::Io(std::io::Error::other(err)))??;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "event=server_start module=server status=ok addr={addr} version={}",
        itemlist_core::core_version()
    );

    axum::serve(listener, http::router(state)).await?;
    Ok(())
}
