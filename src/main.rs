use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};
use shelf::api::CatalogClient;
use shelf::core::config::{self, CliOverrides, ShelfConfig};
use shelf::core::reminders::{CalendarReminders, ChannelNotifier, JsonCalendar};
use shelf::tui::{self, Launch, Services};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "shelf", about = "Browse a product catalog from the terminal")]
struct Args {
    /// Catalog service base URL (overrides config and SHELF_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Products fetched per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Open the list filtered to this category
    #[arg(short, long)]
    category: Option<String>,

    /// Deep link to open on startup, e.g. productsapp://product/1
    #[arg(short, long)]
    link: Option<String>,

    /// Log verbosity written to shelf.log
    #[arg(long, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to shelf.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("shelf.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        ShelfConfig::default()
    });
    let config = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            page_size: args.page_size,
        },
    );

    info!(
        "Shelf starting up against {} (page size {})",
        config.base_url, config.page_size
    );

    let catalog = CatalogClient::new(&config.base_url, config.timeout)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let (alert_tx, alert_rx) = tokio::sync::mpsc::unbounded_channel();
    let calendar = JsonCalendar::new(
        config.reminder_store_path.clone(),
        config.reminders_enabled,
    );
    let reminders = CalendarReminders::new(
        Arc::new(calendar),
        Arc::new(ChannelNotifier::new(alert_tx)),
        "Shelf",
        config.reminder_lead_hours,
    );

    let services = Services {
        catalog: Arc::new(catalog),
        reminders: Arc::new(reminders),
    };
    let launch = Launch {
        category: args.category,
        link: args.link,
    };

    tui::run(config, services, alert_rx, launch)
}
