/// Registration store: who wants alerts for which station.
///
/// Registrations live in a hosted Supabase project. We talk to it through
/// its PostgREST API:
///   GET  {SUPABASE_URL}/rest/v1/users?select=*&station=eq.{station}
///   POST {SUPABASE_URL}/rest/v1/users
///
/// `RegistrationStore` is the seam the notifier depends on, so tests can
/// swap in an in-memory store.

use crate::config::StoreCredentials;
use crate::error::{QueryError, RegisterError};
use crate::model::{NewRegistration, UserRegistration};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;

/// Postgres SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Lookup and insert of user registrations.
pub trait RegistrationStore {
    /// All users registered for `station`. An empty list is not an error.
    fn users_for_station(&self, station: &str) -> Result<Vec<UserRegistration>, QueryError>;

    /// Inserts a new sign-up.
    fn register(&self, registration: &NewRegistration) -> Result<(), RegisterError>;
}

/// Trims every field and rejects blanks.
pub fn validate_registration(registration: &NewRegistration) -> Result<NewRegistration, RegisterError> {
    let cleaned = NewRegistration {
        name: registration.name.trim().to_string(),
        phone: registration.phone.trim().to_string(),
        station: registration.station.trim().to_string(),
    };

    if cleaned.name.is_empty() || cleaned.phone.is_empty() || cleaned.station.is_empty() {
        return Err(RegisterError::Invalid(
            "name, phone and station are all required".to_string(),
        ));
    }

    Ok(cleaned)
}

// ---------------------------------------------------------------------------
// Supabase (PostgREST)
// ---------------------------------------------------------------------------

/// Registration store backed by the Supabase REST API.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    key: String,
}

impl SupabaseStore {
    /// Builds a store client with a bounded request timeout.
    pub fn new(credentials: &StoreCredentials, timeout: Duration) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: credentials.url.trim_end_matches('/').to_string(),
            key: credentials.key.clone(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/rest/v1/users", self.base_url)
    }
}

/// Builds the PostgREST lookup URL for one station.
pub fn build_users_query_url(base_url: &str, station: &str) -> String {
    format!(
        "{}/rest/v1/users?select=*&station=eq.{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(station)
    )
}

impl RegistrationStore for SupabaseStore {
    fn users_for_station(&self, station: &str) -> Result<Vec<UserRegistration>, QueryError> {
        let url = build_users_query_url(&self.base_url, station);
        tracing::debug!(%station, "querying registrations");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QueryError::Http(response.status().as_u16()));
        }

        let rows = response
            .json::<Vec<serde_json::Value>>()
            .map_err(|e| QueryError::Decode(e.to_string()))?;

        Ok(rows.iter().map(UserRegistration::from_row).collect())
    }

    fn register(&self, registration: &NewRegistration) -> Result<(), RegisterError> {
        let registration = validate_registration(registration)?;

        let response = self
            .client
            .post(self.users_url())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(&[&registration])
            .send()
            .map_err(|e| RegisterError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        if status == StatusCode::CONFLICT || body.contains(UNIQUE_VIOLATION) {
            return Err(RegisterError::AlreadyRegistered);
        }

        Err(RegisterError::Http {
            status: status.as_u16(),
            body,
        })
    }
}
