//! Command-line client for the item list server.
//!
//! # Responsibility
//! - Expose page queries, paged browsing, reordering and selection as
//!   subcommands.
//! - Print results to stdout; diagnostics go to stderr via `log`.

use clap::{Parser, Subcommand};
use itemlist_cli::{ApiError, HttpItemsApi, ItemsApi, ListSession, DEFAULT_SERVER_URL};
use itemlist_cli::session::wait_for_submit;
use itemlist_core::{Item, DEFAULT_LIMIT};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "itemlist", about = "Browse and reorder the item list")]
struct Cli {
    /// Base URL of the server API
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Items fetched per page
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    page_size: usize,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one raw page as JSON
    Page {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Load pages through the merge layer and print the accumulated list
    Browse {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Load pages, move one item, and submit the new order
    Reorder {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        pages: usize,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
    /// Print the global order
    Order {
        /// Number of leading ids to print
        #[arg(long, default_value_t = 20)]
        head: usize,
    },
    /// Replace the selection
    Select { ids: Vec<String> },
    /// Print the selection
    Selection,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = itemlist_core::init_logging(&cli.log_level, None) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("itemlist: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ApiError> {
    let api = Arc::new(HttpItemsApi::new(cli.server_url));
    match cli.command {
        Command::Page {
            search,
            offset,
            limit,
        } => {
            let page = api
                .get_items(&search, offset, limit.unwrap_or(cli.page_size))
                .await?;
            let json = serde_json::to_string_pretty(&page)
                .map_err(|err| ApiError::Decode(err.to_string()))?;
            println!("{json}");
        }
        Command::Browse { search, pages } => {
            let session = ListSession::new(api, cli.page_size);
            load_pages(&session, &search, pages).await?;
            print_items(&session.items());
            println!("shown={} total={}", session.items().len(), session.total());
        }
        Command::Reorder {
            search,
            pages,
            from,
            to,
        } => {
            let session = ListSession::new(api, cli.page_size);
            load_pages(&session, &search, pages).await?;
            let Some(submit) = session.reorder_local(from, to) else {
                eprintln!("itemlist: index {from} is outside the loaded list");
                return Ok(());
            };
            // The session never waits on a submit; a one-shot command must,
            // or the runtime shuts down before the request is sent.
            wait_for_submit(submit).await;
            print_items(&session.items());
        }
        Command::Order { head } => {
            let order = api.get_order("").await?;
            println!("length={}", order.len());
            for id in order.iter().take(head) {
                println!("{id}");
            }
        }
        Command::Select { ids } => {
            api.set_selection(&ids).await?;
            println!("selected={}", ids.len());
        }
        Command::Selection => {
            for id in api.get_selection().await? {
                println!("{id}");
            }
        }
    }
    Ok(())
}

async fn load_pages<A: ItemsApi + 'static>(
    session: &ListSession<A>,
    search: &str,
    pages: usize,
) -> Result<(), ApiError> {
    session.set_search(search).await?;
    for _ in 0..pages {
        if session.load_more().await?.is_none() {
            break;
        }
    }
    Ok(())
}

fn print_items(items: &[Item]) {
    for (index, item) in items.iter().enumerate() {
        println!("{index:>6}  {:>8}  {}  <{}>", item.id, item.name, item.email);
    }
}
