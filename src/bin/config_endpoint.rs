//! Public Config Endpoint
//!
//! Serves the Supabase URL and anonymous key to the sign-up front-end,
//! with open CORS.
//!
//! Usage:
//!   cargo run --bin config_endpoint -- --port 8080
//!
//! Environment:
//!   SUPABASE_URL, SUPABASE_ANON_KEY - returned as-is (empty if unset)
//!   PORT                            - listen port (default: 8080)

use clap::Parser;
use flood_alert_service::config::AppConfig;
use flood_alert_service::endpoint;
use flood_alert_service::logging;

#[derive(Debug, Parser)]
#[command(name = "config_endpoint", about = "Serve public front-end configuration")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

fn main() {
    // `.env` must be loaded before clap reads `env = ...` defaults.
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init();

    println!("🌐 Flood Alert Config Endpoint");
    println!("==============================\n");

    let config = AppConfig::from_env();
    if config.public.supabase_url.is_empty() || config.public.supabase_anon_key.is_empty() {
        tracing::warn!("SUPABASE_URL or SUPABASE_ANON_KEY unset; serving empty values");
    }

    if let Err(e) = endpoint::start_config_server(args.port, config.public) {
        tracing::error!("❌ Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
