/// Single-run alert pipeline: load → evaluate → notify.
///
/// 1. Load the river data file and pick the latest snapshot with data
/// 2. Evaluate every station against the discharge threshold
/// 3. Notify registered users for each alerting station
///
/// A loading failure ends the run before anything is sent. A failure
/// while notifying one station is logged and the run moves on.

use crate::config::MonitorSettings;
use crate::error::LoadError;
use crate::gateway::MessageGateway;
use crate::loader;
use crate::model::format_discharge;
use crate::notifier::{NotifyOutcome, Notifier};
use crate::registry::RegistrationStore;
use crate::threshold::{self, StationEvaluation};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// What happened to one station during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum StationOutcome {
    /// At or below the threshold.
    Normal,
    /// Above the threshold; users were looked up and messaged.
    Notified(NotifyOutcome),
    /// Above the threshold but the registration lookup failed.
    QueryFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationReport {
    pub evaluation: StationEvaluation,
    pub outcome: StationOutcome,
}

impl StationReport {
    pub fn sent(&self) -> usize {
        match &self.outcome {
            StationOutcome::Notified(n) => n.sent,
            _ => 0,
        }
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    /// Date label of the evaluated snapshot.
    pub snapshot_date: String,
    pub stations: Vec<StationReport>,
    /// Successful sends across every alerting station.
    pub total_sent: usize,
}

impl RunReport {
    pub fn alerting_stations(&self) -> impl Iterator<Item = &StationReport> {
        self.stations.iter().filter(|s| s.evaluation.alerting)
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Runs the pipeline once.
///
/// # Errors
/// Only data file problems (`LoadError`) are returned; per-station and
/// per-user failures are folded into the report.
pub fn run_once(
    settings: &MonitorSettings,
    store: &dyn RegistrationStore,
    gateway: &dyn MessageGateway,
) -> Result<RunReport, LoadError> {
    let started_at = Utc::now();
    let snapshot = loader::load_latest_snapshot(&settings.data_file)?;
    let snapshot_date = snapshot.date_label();

    info!(date = %snapshot_date, "📊 Checking data for date: {}", snapshot_date);

    let notifier = Notifier::new(store, gateway);
    let mut stations = Vec::new();
    let mut total_sent = 0;

    for (name, metrics) in snapshot.station_metrics() {
        let evaluation = threshold::evaluate_station(
            name,
            metrics,
            &settings.discharge_marker,
            settings.discharge_threshold,
        );
        let discharge = format_discharge(evaluation.discharge);

        let outcome = if !evaluation.alerting {
            info!(station = %name, %discharge, "✓ {}: {} cusecs (Normal)", name, discharge);
            StationOutcome::Normal
        } else {
            warn!(station = %name, %discharge, "⚠️  HIGH DISCHARGE at {}: {} cusecs", name, discharge);
            match notifier.notify(name, evaluation.discharge) {
                Ok(n) => StationOutcome::Notified(n),
                Err(e) => {
                    error!(station = %name, error = %e, "✗ Error fetching users for {}: {}", name, e);
                    StationOutcome::QueryFailed(e.to_string())
                }
            }
        };

        let report = StationReport { evaluation, outcome };
        total_sent += report.sent();
        stations.push(report);
    }

    info!(total_sent, "📨 Total alerts sent: {}", total_sent);

    Ok(RunReport {
        started_at,
        snapshot_date,
        stations,
        total_sent,
    })
}
