//! Almacen CLI - Warehouse positions, stock moves and goods receipts
//!
//! Talks to the warehouse REST backend through the optimistic stock cache:
//! every move is applied locally first and rolled back if the backend
//! rejects it.

mod api;
mod config;
mod notify;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use rust_decimal::Decimal;
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use almacen::{
    AdjustmentDirection, CacheConfig, DomainError, InternalTransfer, PlacementCriteria, Position,
    QuickAdd, RefreshConfig, RefreshScheduler, Remito, StockAdjustment, StockEntry, StockRow,
    StockService, SupplierRef,
};
use api::HttpStockApi;
use config::Config;
use notify::TerminalNotifier;

type Service = StockService<HttpStockApi, TerminalNotifier>;

#[derive(Parser)]
#[command(name = "almacen")]
#[command(
    about = "Almacen CLI - Warehouse positions, stock moves and goods receipts",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Placement filters shared by the listing commands
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Rack number
    #[arg(long)]
    rack: Option<String>,
    /// Row (fila) number
    #[arg(long)]
    row: Option<String>,
    /// Level (A or B)
    #[arg(long)]
    level: Option<String>,
    /// Aisle (pasillo) number
    #[arg(long)]
    aisle: Option<String>,
}

impl From<FilterArgs> for PlacementCriteria {
    fn from(args: FilterArgs) -> Self {
        PlacementCriteria {
            rack: args.rack,
            row: args.row,
            level: args.level,
            aisle: args.aisle,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List positions and what they hold
    Positions {
        /// Free-text search (every word must match)
        #[arg(short, long, default_value = "")]
        search: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List stock, one line per item and position
    Stock {
        /// Free-text search (every word must match)
        #[arg(short, long, default_value = "")]
        search: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Per-item totals across all positions
    Consolidated {
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Search the item catalogue
    Items {
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// List suppliers and clients
    Suppliers,

    /// Move stock between two positions
    Transfer {
        /// Item ID
        item: String,
        /// Source position ID
        #[arg(long)]
        from: String,
        /// Destination position ID
        #[arg(long)]
        to: String,
        #[arg(short, long, default_value = "0")]
        kilos: Decimal,
        #[arg(short, long, default_value = "0")]
        units: i64,
        /// Partition (partida)
        #[arg(long)]
        partition: Option<String>,
    },

    /// Quick add: put stock of an item at a position
    Add {
        /// Position ID
        position: String,
        /// Item ID
        item: String,
        #[arg(short, long, default_value = "0")]
        kilos: Decimal,
        #[arg(short, long, default_value = "0")]
        units: i64,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Supplier ID
        #[arg(long)]
        supplier: Option<String>,
        /// Partition (partida)
        #[arg(long)]
        partition: Option<String>,
    },

    /// Correct the quantity of an item at a position
    Adjust {
        /// Position ID
        position: String,
        /// Item ID
        item: String,
        /// increase or decrease
        direction: AdjustmentDirection,
        #[arg(short, long, default_value = "0")]
        kilos: Decimal,
        #[arg(short, long, default_value = "0")]
        units: i64,
        /// Partition (partida); defaults to the item's first lot at the position
        #[arg(long)]
        partition: Option<String>,
        /// Reason recorded with the adjustment
        #[arg(short, long)]
        reason: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Register a remito (goods receipt) from a JSON file
    Receive {
        /// Path to the remito JSON
        file: String,
    },

    /// Keep the position cache fresh in the background until Ctrl-C
    Watch {
        /// Seconds between staleness checks
        #[arg(short, long, default_value = "60")]
        interval: u64,
    },

    /// Show or update configuration
    Config {
        /// Set the backend base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Set the request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Positions { search, filter } => cmd_positions(&search, filter.into()).await,
        Commands::Stock { search, filter } => cmd_stock(&search, filter.into()).await,
        Commands::Consolidated { search } => cmd_consolidated(&search).await,
        Commands::Items { search } => cmd_items(&search).await,
        Commands::Suppliers => cmd_suppliers().await,
        Commands::Transfer {
            item,
            from,
            to,
            kilos,
            units,
            partition,
        } => {
            let transfer = InternalTransfer {
                item_id: item,
                partition,
                from_position_id: from,
                to_position_id: to,
                kilos,
                units,
            };
            cmd_transfer(transfer).await
        }
        Commands::Add {
            position,
            item,
            kilos,
            units,
            category,
            description,
            supplier,
            partition,
        } => {
            let entry = StockEntry {
                item_id: item,
                category,
                description,
                supplier: supplier.map(|id| SupplierRef { id, name: None }),
                partition,
                kilos,
                units,
            };
            cmd_add(QuickAdd { position_id: position, entry }).await
        }
        Commands::Adjust {
            position,
            item,
            direction,
            kilos,
            units,
            partition,
            reason,
            yes,
        } => {
            let adjustment = StockAdjustment {
                position_id: position,
                item_id: item,
                partition,
                direction,
                kilos,
                units,
                reason,
            };
            cmd_adjust(adjustment, yes).await
        }
        Commands::Receive { file } => cmd_receive(&file).await,
        Commands::Watch { interval } => cmd_watch(Duration::from_secs(interval)).await,
        Commands::Config { base_url, timeout } => cmd_config(base_url, timeout),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Build the stock service from the stored configuration
fn connect() -> Result<Service> {
    let config = Config::load()?;
    tracing::debug!("Using backend {}", config.base_url);

    let api = HttpStockApi::new(&config.base_url, config.timeout())?;
    let cache = CacheConfig {
        ttl: config.cache_ttl(),
    };
    Ok(StockService::new(
        Arc::new(api),
        Arc::new(TerminalNotifier),
        Some(cache),
    ))
}

/// Report a failed query; actions already reported through the notifier
fn fail(e: &DomainError) -> ExitCode {
    tracing::debug!("{:?}", e);
    eprintln!("{} {}", "✗".red(), e.user_message().red());
    ExitCode::FAILURE
}

fn exit_code(result: Result<(), DomainError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Connect and load positions, or report why not
async fn loaded_service() -> Result<Result<Service, ExitCode>> {
    let mut service = connect()?;
    match service.ensure_fresh().await {
        Ok(_) => Ok(Ok(service)),
        Err(e) => Ok(Err(fail(&e))),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_positions(search: &str, criteria: PlacementCriteria) -> Result<ExitCode> {
    let service = match loaded_service().await? {
        Ok(service) => service,
        Err(code) => return Ok(code),
    };

    let positions = service.search_positions(search, &criteria);
    if positions.is_empty() {
        println!("No positions match.");
        return Ok(ExitCode::SUCCESS);
    }

    for position in positions {
        print_position(position);
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_stock(search: &str, criteria: PlacementCriteria) -> Result<ExitCode> {
    let service = match loaded_service().await? {
        Ok(service) => service,
        Err(code) => return Ok(code),
    };

    let rows = service.search_stock(search, &criteria);
    if rows.is_empty() {
        println!("No stock matches.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} rows", rows.len().to_string().green());
    for row in &rows {
        print_row(row);
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_consolidated(search: &str) -> Result<ExitCode> {
    let mut service = connect()?;
    let totals = match service.consolidated_stock().await {
        Ok(totals) => almacen::filter_by_search(totals, search),
        Err(e) => return Ok(fail(&e)),
    };

    if totals.is_empty() {
        println!("No items match.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Consolidated stock:".bold());
    for total in totals {
        println!(
            "  {} {} {} {} kg, {} u ({} positions)",
            total.item_id.cyan(),
            total.category,
            total.description.dimmed(),
            total.kilos.normalize(),
            total.units,
            total.positions
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_items(search: &str) -> Result<ExitCode> {
    let service = connect()?;
    let items = match service.items(search).await {
        Ok(items) => items,
        Err(e) => return Ok(fail(&e)),
    };

    if items.is_empty() {
        println!("No items found for '{}'", search);
        return Ok(ExitCode::SUCCESS);
    }

    for item in items {
        let supplier = item
            .supplier
            .as_ref()
            .map(|s| s.name.clone().unwrap_or_else(|| s.id.clone()))
            .unwrap_or_default();
        println!(
            "  {} {} {} {}",
            item.id.cyan(),
            item.category,
            item.description,
            supplier.dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_suppliers() -> Result<ExitCode> {
    let mut service = connect()?;
    let suppliers = match service.suppliers().await {
        Ok(suppliers) => suppliers,
        Err(e) => return Ok(fail(&e)),
    };

    println!("{}", "Suppliers:".bold());
    for supplier in suppliers {
        println!(
            "  {} {} [{}]",
            supplier.id.dimmed(),
            supplier.name.cyan(),
            supplier.role()
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_transfer(transfer: InternalTransfer) -> Result<ExitCode> {
    let mut service = match loaded_service().await? {
        Ok(service) => service,
        Err(code) => return Ok(code),
    };
    Ok(exit_code(service.internal_transfer(&transfer).await))
}

async fn cmd_add(add: QuickAdd) -> Result<ExitCode> {
    let mut service = match loaded_service().await? {
        Ok(service) => service,
        Err(code) => return Ok(code),
    };
    Ok(exit_code(service.quick_add(&add).await))
}

async fn cmd_adjust(adjustment: StockAdjustment, yes: bool) -> Result<ExitCode> {
    let mut service = match loaded_service().await? {
        Ok(service) => service,
        Err(code) => return Ok(code),
    };

    if let Some(position) = service.position(&adjustment.position_id) {
        print_position(position);
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "{} {} kg / {} u of {}?",
                adjustment.direction,
                adjustment.kilos.normalize(),
                adjustment.units,
                adjustment.item_id
            ))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    Ok(exit_code(service.adjust_stock(&adjustment).await))
}

async fn cmd_receive(file: &str) -> Result<ExitCode> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read file: {}", file))?;
    let remito: Remito = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid remito", file))?;

    println!(
        "Remito {}: {} lines, {} kg, {} u",
        remito.number.cyan(),
        remito.lines.len(),
        remito.total_kilos().normalize(),
        remito.total_units()
    );

    let mut service = connect()?;
    Ok(exit_code(service.receive_remito(&remito).await))
}

async fn cmd_watch(interval: Duration) -> Result<ExitCode> {
    let service = Arc::new(tokio::sync::Mutex::new(connect()?));
    let config = RefreshConfig {
        interval,
        enabled: true,
    };
    let handle = RefreshScheduler::new(Arc::clone(&service), Some(config)).start();

    println!("Watching positions every {:?} (Ctrl-C to stop)", interval);
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    handle.abort();

    let service = service.lock().await;
    println!(
        "{} positions cached, last fetched {}",
        service.positions().len(),
        service
            .fetched_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_config(base_url: Option<String>, timeout: Option<u64>) -> Result<ExitCode> {
    if base_url.is_some() || timeout.is_some() {
        let mut stored = Config::load_file()?;
        if let Some(url) = base_url {
            stored.base_url = url;
        }
        if let Some(secs) = timeout {
            stored.timeout_secs = secs;
        }
        stored.save()?;
        println!("{} Configuration saved to {:?}", "✓".green(), Config::config_path()?);
    }

    let config = Config::load()?;
    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!("  Timeout: {}s", config.timeout_secs);
    println!("  Cache TTL: {}s", config.cache_ttl_secs);

    Ok(ExitCode::SUCCESS)
}

// ============================================
// Output
// ============================================

fn print_position(position: &Position) {
    println!("{} {}", position.title().bold(), position.id.dimmed());
    if position.entries.is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    for entry in &position.entries {
        println!("  {}", describe_entry(entry));
    }
}

fn print_row(row: &StockRow) {
    println!("  {:<28} {}", row.placement.title(), describe_entry(&row.entry));
}

fn describe_entry(entry: &StockEntry) -> String {
    let mut line = format!(
        "{} {} {} {} kg, {} u",
        entry.item_id.cyan(),
        entry.category,
        entry.description,
        entry.kilos.normalize(),
        entry.units
    );
    if let Some(partition) = &entry.partition {
        line.push_str(&format!(" [{}]", partition));
    }
    if let Some(name) = entry.supplier_name() {
        line.push_str(&format!(" {}", name.dimmed()));
    }
    line
}
