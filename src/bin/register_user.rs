//! User Sign-Up
//!
//! Registers a phone number for alerts on one station, the same insert
//! the sign-up page performs.
//!
//! Usage:
//!   cargo run --bin register_user -- --name "Ayesha" --phone +923001234567 --station Kotri
//!
//! Environment:
//!   SUPABASE_URL, SUPABASE_KEY - registration store (required)

use clap::Parser;
use flood_alert_service::config::{AppConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use flood_alert_service::error::RegisterError;
use flood_alert_service::logging;
use flood_alert_service::model::NewRegistration;
use flood_alert_service::registry::{RegistrationStore, SupabaseStore};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "register_user", about = "Sign a phone number up for station alerts")]
struct Args {
    #[arg(long)]
    name: String,

    #[arg(long)]
    phone: String,

    /// Station name exactly as it appears in the river data file
    #[arg(long)]
    station: String,
}

fn main() {
    // `.env` must be loaded before clap reads `env = ...` defaults.
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init();

    let config = AppConfig::from_env();
    let credentials = match config.require_store() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let store = match SupabaseStore::new(credentials, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("✗ Failed to create Supabase client: {}", e);
            std::process::exit(1);
        }
    };

    let registration = NewRegistration {
        name: args.name,
        phone: args.phone,
        station: args.station,
    };

    match store.register(&registration) {
        Ok(()) => println!("✓ Successfully signed up for alerts!"),
        Err(RegisterError::AlreadyRegistered) => {
            eprintln!("✗ This phone number is already registered.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("✗ Error saving data: {}", e);
            std::process::exit(1);
        }
    }
}
