use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use bookchat::config::AppConfig;
use bookchat::display::terminal::TerminalSurface;
use bookchat::display::RecordingSurface;
use bookchat::errors::TransportError;
use bookchat::models::{Origin, StatusField};
use bookchat::services::transport::http::HttpTransport;
use bookchat::services::transport::ChatTransport;
use bookchat::session::{ChatSession, RESET_ERROR_REPLY, SEND_ERROR_REPLY};

// ── Mock Backend ──

enum Canned {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
}

#[derive(Default)]
struct MockBackend {
    responses: Mutex<VecDeque<Canned>>,
    chat_bodies: Mutex<Vec<Value>>,
    reset_calls: Mutex<usize>,
}

impl MockBackend {
    fn reply(&self, next: Canned) {
        self.responses.lock().unwrap().push_back(next);
    }

    fn next_response(&self) -> Response {
        match self.responses.lock().unwrap().pop_front() {
            Some(Canned::Json(status, body)) => (status, Json(body)).into_response(),
            Some(Canned::Raw(status, body)) => (status, body).into_response(),
            None => (StatusCode::INTERNAL_SERVER_ERROR, "no canned response").into_response(),
        }
    }
}

async fn chat(State(backend): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    backend.chat_bodies.lock().unwrap().push(body);
    backend.next_response()
}

async fn reset(State(backend): State<Arc<MockBackend>>) -> Response {
    *backend.reset_calls.lock().unwrap() += 1;
    backend.next_response()
}

// ── Helpers ──

async fn spawn_backend() -> (Arc<MockBackend>, SocketAddr) {
    let backend = Arc::new(MockBackend::default());
    let app = Router::new()
        .route("/chat", post(chat))
        .route("/reset", post(reset))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (backend, addr)
}

fn test_config(addr: SocketAddr) -> AppConfig {
    AppConfig {
        backend_url: format!("http://{addr}/"),
        greeting: "Hi! I'm your appointment booking assistant.".to_string(),
    }
}

fn info(name: Option<&str>, email: Option<&str>, service: Option<&str>, date: Option<&str>) -> Value {
    json!({ "name": name, "email": email, "service": service, "date": date })
}

// ── Transport Tests ──

#[tokio::test]
async fn test_chat_posts_message_body() {
    let (backend, addr) = spawn_backend().await;
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({
            "reply": "Nice to meet you, Alice!",
            "isComplete": false,
            "appointmentInfo": info(Some("Alice"), None, None, None),
        }),
    ));

    let transport = HttpTransport::new(&test_config(addr).backend_url).unwrap();
    let reply = transport.send_chat_message("my name is Alice").await.unwrap();

    assert_eq!(reply.reply, "Nice to meet you, Alice!");
    assert_eq!(reply.is_complete, Some(false));
    let fields = reply.appointment_info.unwrap();
    let keys: Vec<&str> = fields.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["name", "email", "service", "date"]);

    let bodies = backend.chat_bodies.lock().unwrap();
    assert_eq!(bodies.as_slice(), [json!({ "message": "my name is Alice" })]);
}

#[tokio::test]
async fn test_reset_posts_without_body() {
    let (backend, addr) = spawn_backend().await;
    backend.reply(Canned::Json(StatusCode::OK, json!({ "reply": "Appointment reset successfully." })));

    let transport = HttpTransport::new(&test_config(addr).backend_url).unwrap();
    let reply = transport.reset_session().await.unwrap();

    assert_eq!(reply.reply, "Appointment reset successfully.");
    assert!(reply.appointment_info.is_none());
    assert_eq!(*backend.reset_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_error_status_is_failure_even_with_reply() {
    let (backend, addr) = spawn_backend().await;
    backend.reply(Canned::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "reply": "Error: agent unavailable" }),
    ));

    let transport = HttpTransport::new(&test_config(addr).backend_url).unwrap();
    let err = transport.send_chat_message("hello").await.unwrap_err();
    assert!(matches!(err, TransportError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let (backend, addr) = spawn_backend().await;
    backend.reply(Canned::Raw(StatusCode::OK, "<html>oops</html>"));
    backend.reply(Canned::Json(StatusCode::OK, json!({ "message": "wrong key" })));

    let transport = HttpTransport::new(&test_config(addr).backend_url).unwrap();
    for _ in 0..2 {
        let err = transport.send_chat_message("hello").await.unwrap_err();
        assert!(matches!(err, TransportError::MalformedResponse(_)));
    }
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(&format!("http://{addr}")).unwrap();
    let err = transport.reset_session().await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)));
}

// ── Session Flow Tests ──

#[tokio::test]
async fn test_booking_flow_reveals_ticket() {
    let (backend, addr) = spawn_backend().await;
    let config = test_config(addr);
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({
            "reply": "Thanks Alice! What's your email?",
            "appointmentInfo": info(Some("Alice"), None, Some("haircut"), None),
        }),
    ));
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({
            "reply": "✅ Booking complete! Ticket: APPT-48213",
            "isComplete": true,
            "appointmentInfo": info(Some("Alice"), Some("alice@example.com"), Some("haircut"), Some("2030-06-15")),
        }),
    ));

    let transport = HttpTransport::new(&config.backend_url).unwrap();
    let mut session = ChatSession::new(config.greeting.clone());
    let mut surface = TerminalSurface::new(Vec::new());

    session
        .submit_user_message(&transport, &mut surface, "I'm Alice, I need a haircut")
        .await
        .unwrap();
    assert!(!session.is_ticket_visible());
    assert_eq!(session.status_fields()[1].status, StatusField::Missing);

    session
        .submit_user_message(&transport, &mut surface, "alice@example.com on 2030-06-15")
        .await
        .unwrap();
    assert_eq!(session.visible_ticket(), Some("APPT-48213"));
    assert!(session.status_fields().iter().all(|f| f.status.is_complete()));

    assert_eq!(surface.entries().len(), 5);
    assert_eq!(surface.ticket(), Some("APPT-48213"));
    let out = String::from_utf8(surface.into_inner()).unwrap();
    assert!(out.contains("Ticket number: APPT-48213"));
    assert!(out.contains("  email    Missing"));
}

#[tokio::test]
async fn test_backend_errors_become_bot_messages() {
    let (backend, addr) = spawn_backend().await;
    let config = test_config(addr);
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({ "reply": "Hi Bob", "appointmentInfo": info(Some("Bob"), None, None, None) }),
    ));
    backend.reply(Canned::Json(StatusCode::INTERNAL_SERVER_ERROR, json!({ "reply": "Error: boom" })));
    backend.reply(Canned::Raw(StatusCode::BAD_GATEWAY, "bad gateway"));

    let transport = HttpTransport::new(&config.backend_url).unwrap();
    let mut session = ChatSession::new(config.greeting.clone());
    let mut surface = RecordingSurface::default();

    session.submit_user_message(&transport, &mut surface, "I'm Bob").await.unwrap();
    let snapshot = session.snapshot().cloned();

    session.submit_user_message(&transport, &mut surface, "haircut").await.unwrap();
    let last = session.transcript().last().unwrap();
    assert_eq!((last.origin, last.text.as_str()), (Origin::Bot, SEND_ERROR_REPLY));
    assert_eq!(session.snapshot().cloned(), snapshot);

    session.reset_session(&transport, &mut surface).await.unwrap();
    let last = session.transcript().last().unwrap();
    assert_eq!((last.origin, last.text.as_str()), (Origin::Bot, RESET_ERROR_REPLY));
    // greeting, two exchanges, one failed reset
    assert_eq!(session.transcript().len(), 6);
    assert_eq!(session.snapshot().cloned(), snapshot);
}

#[tokio::test]
async fn test_reset_flow_clears_transcript() {
    let (backend, addr) = spawn_backend().await;
    let config = test_config(addr);
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({
            "reply": "Booked. Ticket: APPT-777",
            "appointmentInfo": info(Some("Alice"), Some("a@b.co"), Some("massage"), Some("2030-01-02")),
        }),
    ));
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({
            "reply": "Appointment reset successfully.",
            "appointmentInfo": info(None, None, None, None),
        }),
    ));

    let transport = HttpTransport::new(&config.backend_url).unwrap();
    let mut session = ChatSession::new(config.greeting.clone());
    let mut surface = TerminalSurface::new(Vec::new());
    session.flush(&mut surface);

    session.submit_user_message(&transport, &mut surface, "book it").await.unwrap();
    assert!(session.is_ticket_visible());
    let printed_before_reset = surface.get_ref().len();

    session.reset_session(&transport, &mut surface).await.unwrap();
    let texts: Vec<&str> = session.transcript().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec![config.greeting.as_str(), "Appointment reset successfully."]);
    assert!(!session.is_ticket_visible());
    assert_eq!(surface.ticket(), None);
    assert_eq!(surface.entries().len(), 2);
    assert!(session
        .status_fields()
        .iter()
        .all(|f| f.status == StatusField::Missing));

    let out = String::from_utf8(surface.into_inner()).unwrap();
    let after_reset = &out[printed_before_reset..];
    assert!(after_reset.contains("---- conversation reset ----"));
    assert!(after_reset.contains("  name     Missing"));
    assert!(!after_reset.contains("APPT-777"));
}

#[tokio::test]
async fn test_incomplete_snapshot_hides_rendered_ticket() {
    let (backend, addr) = spawn_backend().await;
    let config = test_config(addr);
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({
            "reply": "Booked. Ticket: APPT-777",
            "appointmentInfo": info(Some("Alice"), Some("a@b.co"), Some("massage"), Some("2030-01-02")),
        }),
    ));
    backend.reply(Canned::Json(
        StatusCode::OK,
        json!({
            "reply": "Sure, which date instead?",
            "appointmentInfo": info(Some("Alice"), Some("a@b.co"), Some("massage"), None),
        }),
    ));

    let transport = HttpTransport::new(&config.backend_url).unwrap();
    let mut session = ChatSession::new(config.greeting.clone());
    let mut surface = TerminalSurface::new(Vec::new());

    session.submit_user_message(&transport, &mut surface, "book it").await.unwrap();
    assert_eq!(surface.ticket(), Some("APPT-777"));
    let printed_before_change = surface.get_ref().len();

    session
        .submit_user_message(&transport, &mut surface, "change the date")
        .await
        .unwrap();
    assert!(!session.is_ticket_visible());
    assert_eq!(surface.ticket(), None);

    let out = String::from_utf8(surface.into_inner()).unwrap();
    let after_change = &out[printed_before_change..];
    assert!(after_change.contains("  date     Missing"));
    assert!(!after_change.contains("Ticket number"));
}
