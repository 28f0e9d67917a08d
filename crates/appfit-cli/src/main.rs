#![forbid(unsafe_code)]

use appfit_core::{compute, NameOrder, SourceFilter, StatusFilter, StatusSort, ViewOptions};
use appfit_model::{AppRecord, InstalledPackage, PackageId, DIMENSION_BRIDGED, DIMENSION_NATIVE};
use appfit_store::{RecordStore, SqliteStore};
use appfit_sync::{
    rebuild_known_set, HttpRatingsService, RatingsRefreshOrchestrator, StaticInventory,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("APPFIT_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Any,
    Official,
    Other,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Any,
    Native,
    Bridged,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusSortArg {
    None,
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Az,
    Za,
}

#[derive(Parser)]
#[command(name = "appfit", about = "Browse and maintain the local app-compatibility database")]
struct Cli {
    /// Path to the record database (env: APPFIT_DB).
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List records through the filter/sort pipeline.
    List {
        #[arg(long, value_enum, default_value = "any")]
        source: SourceArg,
        #[arg(long, value_enum, default_value = "any")]
        status: StatusArg,
        #[arg(long, value_enum, default_value = "none")]
        status_sort: StatusSortArg,
        #[arg(long, value_enum, default_value = "az")]
        order: OrderArg,
        /// Only favorited records.
        #[arg(long)]
        favorites: bool,
        /// Emit records as JSON instead of table lines.
        #[arg(long)]
        json: bool,
    },
    /// Search records by display-name fragment.
    Search {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// Set or clear the favorite flag on a record.
    Favorite {
        package: String,
        #[arg(long)]
        unset: bool,
    },
    /// Merge an installed-package scan (JSON array) into the database.
    Import { inventory: PathBuf },
    /// Fetch ratings for one package from the remote directory.
    Refresh {
        package: String,
        /// Ratings service base URL (env: APPFIT_ENDPOINT).
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn view_options(
    source: SourceArg,
    status: StatusArg,
    status_sort: StatusSortArg,
    order: OrderArg,
    favorites: bool,
) -> ViewOptions {
    ViewOptions {
        source_filter: match source {
            SourceArg::Any => SourceFilter::Any,
            SourceArg::Official => SourceFilter::OfficialStore,
            SourceArg::Other => SourceFilter::Other,
        },
        status_filter: match status {
            StatusArg::Any => StatusFilter::Any,
            StatusArg::Native => StatusFilter::Native,
            StatusArg::Bridged => StatusFilter::Bridged,
        },
        status_sort: match status_sort {
            StatusSortArg::None => StatusSort::None,
            StatusSortArg::Asc => StatusSort::Asc,
            StatusSortArg::Desc => StatusSort::Desc,
        },
        name_order: match order {
            OrderArg::Az => NameOrder::AToZ,
            OrderArg::Za => NameOrder::ZToA,
        },
        favorites_only: favorites,
    }
}

fn print_records(records: &[AppRecord], json: bool) -> Result<(), String> {
    if json {
        let encoded =
            serde_json::to_string_pretty(records).map_err(|e| format!("encode failed: {e}"))?;
        println!("{encoded}");
        return Ok(());
    }
    for record in records {
        let favorite = if record.is_favorite { "*" } else { " " };
        let version = record.installed_version.as_deref().unwrap_or("-");
        let source = record.installed_from.as_deref().unwrap_or("-");
        println!(
            "{favorite} {:<30} {:<40} {:<10} {:<22} native={} bridged={}",
            record.display_name,
            record.package,
            version,
            source,
            record.status_for(DIMENSION_NATIVE),
            record.status_for(DIMENSION_BRIDGED),
        );
    }
    Ok(())
}

fn parse_package(raw: &str) -> Result<PackageId, String> {
    PackageId::parse(raw).map_err(|e| format!("invalid package id: {e}"))
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();
    let cli = Cli::parse();

    let db_path = cli
        .db
        .or_else(|| env::var("APPFIT_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("appfit.sqlite"));
    let store = Arc::new(SqliteStore::open(&db_path).map_err(|e| e.to_string())?);

    match cli.command {
        Command::List {
            source,
            status,
            status_sort,
            order,
            favorites,
            json,
        } => {
            let records = store.list_all().map_err(|e| e.to_string())?;
            let options = view_options(source, status, status_sort, order, favorites);
            let display = compute(&records, &options);
            print_records(&display, json)?;
        }
        Command::Search { text, json } => {
            let records = store.search(&text).map_err(|e| e.to_string())?;
            print_records(&records, json)?;
        }
        Command::Favorite { package, unset } => {
            let package = parse_package(&package)?;
            store
                .set_favorite(&package, !unset)
                .map_err(|e| e.to_string())?;
            info!(package = %package, favorite = !unset, "favorite updated");
        }
        Command::Import { inventory } => {
            let raw = std::fs::read_to_string(&inventory)
                .map_err(|e| format!("read {} failed: {e}", inventory.display()))?;
            let packages: Vec<InstalledPackage> =
                serde_json::from_str(&raw).map_err(|e| format!("inventory parse failed: {e}"))?;
            let rebuilt =
                rebuild_known_set(store.as_ref(), &StaticInventory::new(packages))
                    .map_err(|e| e.to_string())?;
            info!(records = rebuilt.len(), "inventory imported");
        }
        Command::Refresh { package, endpoint } => {
            let package = parse_package(&package)?;
            let endpoint = endpoint
                .or_else(|| env::var("APPFIT_ENDPOINT").ok())
                .ok_or_else(|| "no ratings endpoint; pass --endpoint or set APPFIT_ENDPOINT".to_string())?;
            let service = Arc::new(HttpRatingsService::new(endpoint));
            let orchestrator = RatingsRefreshOrchestrator::new(service, store);
            let record = orchestrator
                .ensure_ratings_loaded(&package)
                .await
                .map_err(|e| e.to_string())?;
            print_records(&[record], false)?;
        }
    }

    Ok(())
}
