/// Discharge threshold evaluation.
///
/// Pure functions over a station's metric map: no I/O, no logging.

use crate::model::StationMetrics;

/// Default alert threshold, in cusecs.
pub const DEFAULT_DISCHARGE_THRESHOLD: f64 = 100_000.0;

/// Outcome of evaluating one station against the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct StationEvaluation {
    pub station: String,
    /// Maximum discharge reading, or 0 when the station reported none.
    pub discharge: f64,
    pub alerting: bool,
}

/// Returns the largest numeric value among metrics whose name contains
/// `marker`, or `0.0` when there is none.
///
/// Non-numeric values (strings, nulls, booleans) are ignored.
pub fn effective_discharge(metrics: &StationMetrics, marker: &str) -> f64 {
    metrics
        .iter()
        .filter(|(name, _)| name.contains(marker))
        .filter_map(|(_, value)| value.as_f64())
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

/// A station alerts only when its discharge is strictly above the threshold.
pub fn is_alerting(discharge: f64, threshold: f64) -> bool {
    discharge > threshold
}

/// Evaluates a single station.
pub fn evaluate_station(
    station: &str,
    metrics: &StationMetrics,
    marker: &str,
    threshold: f64,
) -> StationEvaluation {
    let discharge = effective_discharge(metrics, marker);
    StationEvaluation {
        station: station.to_string(),
        discharge,
        alerting: is_alerting(discharge, threshold),
    }
}
