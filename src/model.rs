/// Core data types for the flood alert service.
///
/// Snapshots come from the river data file produced upstream; user
/// registrations come from the hosted `users` table. Nothing in here
/// performs I/O.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// River data
// ---------------------------------------------------------------------------

/// Substring that marks a metric as a discharge reading, e.g.
/// `"DISCHARGE_CUSECS"` or `"DISCHARGE_2"`.
pub const DISCHARGE_MARKER: &str = "DISCHARGE";

/// Metric name → raw JSON value for a single station.
///
/// Values are kept as raw JSON because the upstream scraper writes
/// strings and nulls next to numbers; only numbers are ever compared.
pub type StationMetrics = Map<String, Value>;

/// One dated record of every station's measurements.
///
/// Station order follows the data file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub date: Option<Value>,
    /// Station name → metrics. Usually an object; `null` or a missing
    /// field both mean "no station data".
    #[serde(default)]
    pub stations: Value,
}

impl Snapshot {
    /// Human-readable date label for logging. Missing dates render as
    /// `"unknown"`; non-string identifiers are rendered as JSON.
    pub fn date_label(&self) -> String {
        match &self.date {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// True when the snapshot carries at least one station entry.
    pub fn has_station_data(&self) -> bool {
        self.stations.as_object().is_some_and(|s| !s.is_empty())
    }

    /// Iterates stations in file order, skipping entries whose metrics
    /// are not a JSON object.
    pub fn station_metrics(&self) -> impl Iterator<Item = (&str, &StationMetrics)> {
        self.stations
            .as_object()
            .into_iter()
            .flat_map(|s| s.iter())
            .filter_map(|(name, metrics)| metrics.as_object().map(|m| (name.as_str(), m)))
    }
}

// ---------------------------------------------------------------------------
// Registrations
// ---------------------------------------------------------------------------

/// A row from the `users` table. Extra columns are ignored.
///
/// `phone` is optional because the table does not enforce it; a row
/// without a usable number still counts as one failed delivery.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRegistration {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl UserRegistration {
    /// Builds a registration from one raw row without failing. Numeric
    /// phone columns are accepted; anything else leaves `phone` empty.
    pub fn from_row(row: &Value) -> Self {
        let text = |key: &str| match row.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Self {
            phone: text("phone"),
            station: text("station").unwrap_or_default(),
            name: text("name"),
        }
    }

    /// Destination number, if the row carries a non-blank one.
    pub fn contact(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// A sign-up to insert into the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRegistration {
    pub name: String,
    pub phone: String,
    pub station: String,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// An alert for one alerting station. Built in memory right before
/// dispatch and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub station: String,
    pub discharge: f64,
    pub message: String,
}

impl AlertEvent {
    pub fn new(station: &str, discharge: f64) -> Self {
        Self {
            station: station.to_string(),
            discharge,
            message: format!(
                "ALERT: High water level detected at {} ({} cusecs). Please take necessary precautions.",
                station,
                format_discharge(discharge)
            ),
        }
    }
}

/// Renders a discharge value for the alert text. Whole numbers print
/// without a fractional part, so both `120000` and `120000.0` in the
/// data file become `120000`; other values print unchanged.
pub fn format_discharge(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
