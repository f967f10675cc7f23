/// Integration tests for the Supabase and Telerivet clients.
///
/// These run the real reqwest clients against local tiny_http fakes, so
/// they need no network access or credentials.
///
/// Run with: cargo test --test http_clients

mod common;

use common::FakeServer;
use flood_alert_service::config::{GatewayCredentials, StoreCredentials};
use flood_alert_service::error::{DeliveryError, QueryError, RegisterError};
use flood_alert_service::gateway::{MessageGateway, TelerivetGateway};
use flood_alert_service::model::NewRegistration;
use flood_alert_service::notifier::{Notifier, NotifyOutcome};
use flood_alert_service::registry::{RegistrationStore, SupabaseStore};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn store_for(server: &FakeServer) -> SupabaseStore {
    SupabaseStore::new(
        &StoreCredentials {
            url: server.base_url.clone(),
            key: "service-key".to_string(),
        },
        TIMEOUT,
    )
    .unwrap()
}

fn gateway_for(server: &FakeServer) -> TelerivetGateway {
    TelerivetGateway::with_base_url(
        &server.base_url,
        Some(GatewayCredentials {
            api_key: "abc123".to_string(),
            project_id: "PJ42".to_string(),
        }),
        TIMEOUT,
    )
    .unwrap()
}

fn sign_up() -> NewRegistration {
    NewRegistration {
        name: "Ayesha".to_string(),
        phone: "+923001234567".to_string(),
        station: "Kotri".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Registration store
// ---------------------------------------------------------------------------

#[test]
fn test_users_for_station_filters_by_station() {
    let server = FakeServer::start(vec![(
        200,
        r#"[
            {"id": 1, "name": "Ayesha", "phone": "+923001234567", "station": "Kotri Barrage"},
            {"id": 2, "name": null, "phone": "+923007654321", "station": "Kotri Barrage"}
        ]"#
        .to_string(),
    )]);

    let users = store_for(&server).users_for_station("Kotri Barrage").unwrap();
    let requests = server.finish();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].contact(), Some("+923007654321"));
    assert_eq!(users[1].name, None);

    let req = &requests[0];
    assert_eq!(req.method, "GET");
    assert_eq!(req.url, "/rest/v1/users?select=*&station=eq.Kotri%20Barrage");
    assert_eq!(req.header("apikey"), Some("service-key"));
    assert_eq!(req.header("Authorization"), Some("Bearer service-key"));
}

#[test]
fn test_empty_result_is_not_an_error() {
    let server = FakeServer::start(vec![(200, "[]".to_string())]);
    let users = store_for(&server).users_for_station("Guddu").unwrap();
    server.finish();

    assert!(users.is_empty());
}

#[test]
fn test_store_error_status() {
    let server = FakeServer::start(vec![(401, r#"{"message": "Invalid API key"}"#.to_string())]);
    let result = store_for(&server).users_for_station("Kotri");
    server.finish();

    assert!(matches!(result, Err(QueryError::Http(401))));
}

#[test]
fn test_store_unexpected_body() {
    let server = FakeServer::start(vec![(200, r#"{"rows": []}"#.to_string())]);
    let result = store_for(&server).users_for_station("Kotri");
    server.finish();

    assert!(matches!(result, Err(QueryError::Decode(_))));
}

#[test]
fn test_row_without_phone_does_not_block_the_rest() {
    let supabase = FakeServer::start(vec![(
        200,
        r#"[{"phone": null, "station": "Kotri"}, {"phone": "+222", "station": "Kotri"}]"#
            .to_string(),
    )]);
    let telerivet = FakeServer::start(vec![(200, "{}".to_string())]);
    let store = store_for(&supabase);
    let gateway = gateway_for(&telerivet);

    let outcome = Notifier::new(&store, &gateway).notify("Kotri", 200000.0).unwrap();

    assert_eq!(outcome, NotifyOutcome { attempted: 2, sent: 1 });
    assert_eq!(outcome.failed(), 1);
    supabase.finish();
    let sends = telerivet.finish();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].body.starts_with("to_number=%2B222&"));
}

#[test]
fn test_register_inserts_row() {
    let server = FakeServer::start(vec![(201, String::new())]);
    store_for(&server).register(&sign_up()).unwrap();
    let requests = server.finish();

    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.url, "/rest/v1/users");
    assert_eq!(req.header("Prefer"), Some("return=minimal"));

    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!([{"name": "Ayesha", "phone": "+923001234567", "station": "Kotri"}])
    );
}

#[test]
fn test_register_duplicate_phone() {
    let server = FakeServer::start(vec![(
        409,
        r#"{"code": "23505", "message": "duplicate key value violates unique constraint"}"#
            .to_string(),
    )]);
    let result = store_for(&server).register(&sign_up());
    server.finish();

    assert_eq!(result, Err(RegisterError::AlreadyRegistered));
}

#[test]
fn test_register_other_failure() {
    let server = FakeServer::start(vec![(500, "boom".to_string())]);
    let result = store_for(&server).register(&sign_up());
    server.finish();

    assert_eq!(
        result,
        Err(RegisterError::Http {
            status: 500,
            body: "boom".to_string()
        })
    );
}

#[test]
fn test_register_rejects_blank_fields_without_request() {
    let server = FakeServer::start(vec![]);
    let mut registration = sign_up();
    registration.station = "  ".to_string();

    let result = store_for(&server).register(&registration);
    assert!(server.finish().is_empty());
    assert!(matches!(result, Err(RegisterError::Invalid(_))));
}

// ---------------------------------------------------------------------------
// Messaging gateway
// ---------------------------------------------------------------------------

#[test]
fn test_send_posts_form_with_basic_auth() {
    let server = FakeServer::start(vec![(200, r#"{"id": "SM1"}"#.to_string())]);
    gateway_for(&server)
        .send("+923001234567", "ALERT: High water")
        .unwrap();
    let requests = server.finish();

    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.url, "/projects/PJ42/messages/send");
    assert_eq!(req.header("Authorization"), Some("Basic YWJjMTIzOg=="));
    assert!(
        req.header("Content-Type")
            .unwrap()
            .starts_with("application/x-www-form-urlencoded")
    );
    assert_eq!(req.body, "to_number=%2B923001234567&content=ALERT%3A+High+water");
}

#[test]
fn test_non_200_is_delivery_failure() {
    // 201 is a success elsewhere, but the gateway contract is 200 only.
    let server = FakeServer::start(vec![(201, String::new()), (429, String::new())]);
    let gateway = gateway_for(&server);

    assert_eq!(gateway.send("+1", "x"), Err(DeliveryError::Status(201)));
    assert_eq!(gateway.send("+2", "x"), Err(DeliveryError::Status(429)));
    assert_eq!(server.finish().len(), 2);
}

#[test]
fn test_unreachable_gateway_is_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let gateway = TelerivetGateway::with_base_url(
        &format!("http://{}", addr),
        Some(GatewayCredentials {
            api_key: "k".to_string(),
            project_id: "p".to_string(),
        }),
        TIMEOUT,
    )
    .unwrap();

    assert!(matches!(
        gateway.send("+1", "x"),
        Err(DeliveryError::Transport(_))
    ));
}
