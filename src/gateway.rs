/// SMS delivery through the Telerivet REST API.
///
///   POST https://api.telerivet.com/v1/projects/{project_id}/messages/send
///   Authorization: Basic base64("{api_key}:")
///   body (form): to_number, content
///
/// Only HTTP 200 counts as delivered. There are no retries.

use crate::config::GatewayCredentials;
use crate::error::DeliveryError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use std::time::Duration;

const TELERIVET_API_BASE: &str = "https://api.telerivet.com/v1";

/// Something that can send one text message.
pub trait MessageGateway {
    fn send(&self, to_number: &str, content: &str) -> Result<(), DeliveryError>;
}

/// Builds the Basic auth header value: the API key is the user name and
/// the password is empty.
pub fn basic_auth_header(api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", api_key)))
}

/// Builds the send-message URL for a project.
pub fn build_send_url(base_url: &str, project_id: &str) -> String {
    format!(
        "{}/projects/{}/messages/send",
        base_url.trim_end_matches('/'),
        project_id
    )
}

/// Telerivet client. Credentials are optional: without them every send
/// fails with `DeliveryError::MissingCredentials` instead of aborting
/// the run.
pub struct TelerivetGateway {
    client: Client,
    base_url: String,
    credentials: Option<GatewayCredentials>,
}

impl TelerivetGateway {
    pub fn new(
        credentials: Option<GatewayCredentials>,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        Self::with_base_url(TELERIVET_API_BASE, credentials, timeout)
    }

    /// Same as `new`, pointed at a different API root.
    pub fn with_base_url(
        base_url: &str,
        credentials: Option<GatewayCredentials>,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

impl MessageGateway for TelerivetGateway {
    fn send(&self, to_number: &str, content: &str) -> Result<(), DeliveryError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(DeliveryError::MissingCredentials)?;

        let url = build_send_url(&self.base_url, &credentials.project_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", basic_auth_header(&credentials.api_key))
            .form(&[("to_number", to_number), ("content", content)])
            .send()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        tracing::debug!(%to_number, status, "gateway responded");

        if status == 200 {
            Ok(())
        } else {
            Err(DeliveryError::Status(status))
        }
    }
}
