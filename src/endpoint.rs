/// HTTP endpoint exposing public front-end configuration.
///
/// Endpoints:
/// - GET  (any path)  - `{"SUPABASE_URL": ..., "SUPABASE_ANON_KEY": ...}`
/// - OPTIONS (any path) - CORS preflight, empty body
/// - GET /health      - Service health check
///
/// Request bodies and query strings are ignored. Responses are built by
/// `respond`, which does no I/O; the tiny_http loop only routes bytes.

use crate::config::PublicConfig;
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Body of a successful GET.
#[derive(Debug, Serialize)]
pub struct ConfigBody<'a> {
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: &'a str,
    #[serde(rename = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: &'a str,
}

/// A transport-independent HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl EndpointResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

const ALLOWED_METHODS: &str = "GET, OPTIONS";

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Builds the response for one request.
pub fn respond(method: &Method, url: &str, public: &PublicConfig) -> EndpointResponse {
    let path = url.split('?').next().unwrap_or(url);

    match method {
        Method::Options => EndpointResponse {
            status: 200,
            headers: vec![
                ("Access-Control-Allow-Origin", "*".to_string()),
                ("Access-Control-Allow-Methods", ALLOWED_METHODS.to_string()),
            ],
            body: None,
        },
        Method::Get if path == "/health" => json_response(
            200,
            serde_json::json!({
                "status": "ok",
                "service": "config_endpoint",
                "version": env!("CARGO_PKG_VERSION")
            }),
        ),
        Method::Get => json_response(
            200,
            serde_json::json!(ConfigBody {
                supabase_url: &public.supabase_url,
                supabase_anon_key: &public.supabase_anon_key,
            }),
        ),
        _ => {
            let mut response = json_response(
                405,
                serde_json::json!({
                    "error": "Method not allowed",
                    "allowed": ALLOWED_METHODS
                }),
            );
            response.headers.push(("Allow", ALLOWED_METHODS.to_string()));
            response
        }
    }
}

/// JSON response with the wildcard CORS origin.
fn json_response(status: u16, json: serde_json::Value) -> EndpointResponse {
    EndpointResponse {
        status,
        headers: vec![
            ("Content-Type", "application/json".to_string()),
            ("Access-Control-Allow-Origin", "*".to_string()),
        ],
        body: Some(json.to_string()),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the config endpoint on the specified port. Blocks forever.
pub fn start_config_server(port: u16, public: PublicConfig) -> Result<(), String> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    tracing::info!(port, "📡 Config endpoint listening on http://0.0.0.0:{}", port);
    serve(&server, &public);
    Ok(())
}

/// Answers requests on an already-bound server until it shuts down.
pub fn serve(server: &Server, public: &PublicConfig) {
    for request in server.incoming_requests() {
        let response = respond(request.method(), request.url(), public);
        tracing::debug!(method = %request.method(), url = %request.url(), status = response.status, "request");

        if let Err(e) = request.respond(to_tiny_http(response)) {
            tracing::warn!(error = %e, "Failed to send response");
        }
    }
}

fn to_tiny_http(response: EndpointResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut out = Response::from_data(response.body.unwrap_or_default().into_bytes())
        .with_status_code(StatusCode::from(response.status));

    for (name, value) in &response.headers {
        match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => tracing::warn!(%name, "dropping invalid header"),
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
