/// flood_alert_service: river discharge alerts over SMS.
///
/// # Module structure
///
/// ```text
/// flood_alert_service
/// ├── model     — snapshots, registrations, alert events
/// ├── error     — per-step error enums
/// ├── config    — credentials (env / .env) and monitor settings (flood_alert.toml)
/// ├── loader    — river data file → latest snapshot with station data
/// ├── threshold — effective discharge + alerting classification
/// ├── registry  — registration store trait + Supabase REST client
/// ├── gateway   — message gateway trait + Telerivet client
/// ├── notifier  — texts every user registered for an alerting station
/// ├── pipeline  — one run: load → evaluate → notify
/// ├── endpoint  — public config responder (tiny_http)
/// └── logging   — tracing subscriber setup for the binaries
/// ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod logging;
pub mod model;
pub mod notifier;
pub mod pipeline;
pub mod registry;
pub mod threshold;
