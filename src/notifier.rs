/// Alert dispatch for a single alerting station.
///
/// Looks up everyone registered for the station and texts each of them.
/// A failed send is logged and counted, never fatal. Nothing is
/// remembered between calls, so notifying twice sends twice.

use crate::error::QueryError;
use crate::gateway::MessageGateway;
use crate::model::{AlertEvent, format_discharge};
use crate::registry::RegistrationStore;
use tracing::{info, warn};

/// Result of notifying one station's subscribers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyOutcome {
    pub attempted: usize,
    pub sent: usize,
}

impl NotifyOutcome {
    pub fn failed(&self) -> usize {
        self.attempted - self.sent
    }
}

pub struct Notifier<'a> {
    store: &'a dyn RegistrationStore,
    gateway: &'a dyn MessageGateway,
}

impl<'a> Notifier<'a> {
    pub fn new(store: &'a dyn RegistrationStore, gateway: &'a dyn MessageGateway) -> Self {
        Self { store, gateway }
    }

    /// Texts every user registered for `station`.
    ///
    /// # Errors
    /// `QueryError` if the registration lookup fails; no messages are sent
    /// in that case. Individual delivery failures are not errors.
    pub fn notify(&self, station: &str, discharge: f64) -> Result<NotifyOutcome, QueryError> {
        let users = self.store.users_for_station(station)?;

        if users.is_empty() {
            info!(%station, "ℹ️  No users registered for {}", station);
            return Ok(NotifyOutcome::default());
        }

        let alert = AlertEvent::new(station, discharge);
        let mut outcome = NotifyOutcome::default();

        for user in &users {
            outcome.attempted += 1;

            let Some(phone) = user.contact() else {
                warn!(%station, "✗ Skipping registration without a phone number");
                continue;
            };

            match self.gateway.send(phone, &alert.message) {
                Ok(()) => {
                    outcome.sent += 1;
                    info!(%phone, "✓ Sent SMS to {}", phone);
                }
                Err(e) => {
                    warn!(%phone, error = %e, "✗ Failed to send SMS to {}: {}", phone, e);
                }
            }
        }

        info!(
            %station,
            discharge = %format_discharge(discharge),
            sent = outcome.sent,
            attempted = outcome.attempted,
            "✓ Sent {}/{} alerts for {}",
            outcome.sent,
            outcome.attempted,
            station
        );

        Ok(outcome)
    }
}
