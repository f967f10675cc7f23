//! Flood Alert Service - Single Run
//!
//! Reads the latest river data snapshot, flags stations whose discharge
//! is above the threshold, and texts everyone registered for them.
//! Meant to be run by a scheduler; it exits after one pass.
//!
//! Usage:
//!   cargo run --release
//!   cargo run --release -- --data river_data.json --threshold 120000
//!
//! Environment:
//!   SUPABASE_URL, SUPABASE_KEY            - registration store (required)
//!   TELERIVET_API_KEY, TELERIVET_PROJECT_ID - SMS gateway
//!   RUST_LOG                              - log filter (default: info)

use clap::Parser;
use flood_alert_service::config::{AppConfig, DEFAULT_SETTINGS_FILE, MonitorSettings};
use flood_alert_service::gateway::TelerivetGateway;
use flood_alert_service::logging;
use flood_alert_service::pipeline;
use flood_alert_service::registry::SupabaseStore;
use std::path::PathBuf;
use tracing::{error, warn};

#[derive(Debug, Parser)]
#[command(name = "flood_alert_service", about = "Send SMS alerts for high river discharge")]
struct Args {
    /// River data file (overrides the settings file)
    #[arg(long, env = "FLOOD_ALERT_DATA_FILE")]
    data: Option<PathBuf>,

    /// Monitor settings file
    #[arg(long, env = "FLOOD_ALERT_SETTINGS", default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Discharge threshold in cusecs (overrides the settings file)
    #[arg(long)]
    threshold: Option<f64>,
}

fn main() {
    // `.env` must be loaded before clap reads `env = ...` defaults.
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init();

    println!("{}", "=".repeat(60));
    println!("🌊 FLOOD MONITORING SYSTEM - Single Run");
    println!("{}", "=".repeat(60));

    let config = AppConfig::from_env();

    let mut settings = match MonitorSettings::load(&args.settings) {
        Ok(s) => s,
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };
    if let Some(data) = args.data {
        settings.data_file = data;
    }
    if let Some(threshold) = args.threshold {
        settings.discharge_threshold = threshold;
    }

    let store_credentials = match config.require_store() {
        Ok(c) => c,
        Err(e) => {
            error!("✗ {}", e);
            error!("✗ Cannot proceed without Supabase connection");
            return;
        }
    };

    let store = match SupabaseStore::new(store_credentials, settings.request_timeout()) {
        Ok(s) => s,
        Err(e) => {
            error!("✗ Failed to create Supabase client: {}", e);
            return;
        }
    };

    if config.gateway.is_none() {
        warn!("Missing Telerivet credentials; alerts will be counted as failed");
    }
    let gateway = match TelerivetGateway::new(config.gateway.clone(), settings.request_timeout()) {
        Ok(g) => g,
        Err(e) => {
            error!("✗ Failed to create Telerivet client: {}", e);
            return;
        }
    };

    match pipeline::run_once(&settings, &store, &gateway) {
        Ok(report) => {
            let elapsed = chrono::Utc::now() - report.started_at;
            println!();
            println!(
                "📋 Summary: {} alerts sent, {}/{} stations alerting, {} ms",
                report.total_sent,
                report.alerting_stations().count(),
                report.stations.len(),
                elapsed.num_milliseconds()
            );
        }
        Err(e) => {
            error!("✗ Error checking river data: {}", e);
        }
    }

    println!("{}", "=".repeat(60));
    println!("✓ Monitoring complete");
    println!("{}", "=".repeat(60));
}
