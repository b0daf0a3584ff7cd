//! Streamable HTTP transport.
//!
//! A single `/mcp` route accepts every method:
//!
//! | Method | Behavior |
//! |--------|----------|
//! | `POST` | Dispatch one message or a batch through the caller's session |
//! | `DELETE` | Close the session named by `Mcp-Session-Id` (204) |
//! | other | 405, no server-initiated stream is offered |
//!
//! A POST without a session id opens a session only when its body is a
//! single `initialize` request; the new id is returned in the
//! `Mcp-Session-Id` response header. Any other POST must carry the id of a
//! live session.
//!
//! The Opsgenie credential is resolved per request, before dispatch, from
//! the `X-Opsgenie-Api-Key` header, an `Authorization: Bearer` header, the
//! `apiKey` query parameter, then the process default.

use super::error::{McpError, Result, TransportError, codes};
use super::protocol::{JsonRpcResponse, RpcError, is_initialize_request};
use super::server::McpServer;
use super::session::SessionRegistry;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{ALLOW, AUTHORIZATION};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use opsgenie_mcp_domain::{
    ApiKey, CredentialScope, CredentialSource, ResolvedCredential, resolve_credential,
};
use serde_json::{Value, json};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

pub const SESSION_HEADER: &str = "mcp-session-id";
pub const API_KEY_HEADER: &str = "x-opsgenie-api-key";

/// Shared state of the HTTP transport
#[derive(Clone)]
pub struct HttpState {
    server: Arc<McpServer>,
    sessions: Arc<SessionRegistry>,
    default_key: Option<ApiKey>,
}

impl HttpState {
    pub fn new(server: Arc<McpServer>, default_key: Option<ApiKey>) -> Self {
        Self {
            server,
            sessions: Arc::new(SessionRegistry::new()),
            default_key,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

const API_KEY_QUERY: &str = "apiKey";

/// Credential carried in the query string; the first `apiKey` pair wins
#[derive(Debug, Default)]
struct CredentialQuery {
    api_key: Option<String>,
}

impl CredentialQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            api_key: pairs
                .into_iter()
                .find(|(name, _)| name == API_KEY_QUERY)
                .map(|(_, value)| value),
        }
    }
}

/// Build the axum router for the transport
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/mcp", any(handle_mcp))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `0.0.0.0:port` and serve until cancelled
pub async fn serve_http(state: HttpState, port: u16, cancellation: CancellationToken) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    serve_listener(listener, state, cancellation).await
}

/// Serve on an already bound listener until cancelled, then close all sessions
pub async fn serve_listener(
    listener: TcpListener,
    state: HttpState,
    cancellation: CancellationToken,
) -> Result<()> {
    let local = listener.local_addr()?;
    info!("Opsgenie MCP Server running on HTTP port {}", local.port());

    let sessions = Arc::clone(&state.sessions);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancellation.cancelled().await })
        .await?;

    sessions.close_all();
    info!("HTTP transport stopped");
    Ok(())
}

async fn handle_mcp(
    State(state): State<HttpState>,
    method: Method,
    headers: HeaderMap,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Response {
    let query = match query {
        Ok(Query(pairs)) => CredentialQuery::from_pairs(pairs),
        Err(e) => {
            debug!("Ignoring unreadable query string: {}", e);
            CredentialQuery::default()
        }
    };
    match method {
        Method::POST => handle_post(&state, &headers, &query, &body).await,
        Method::DELETE => handle_delete(&state, &headers),
        other => {
            debug!(method = %other, "Rejecting unsupported method on /mcp");
            method_not_allowed()
        }
    }
}

async fn handle_post(
    state: &HttpState,
    headers: &HeaderMap,
    query: &CredentialQuery,
    body: &[u8],
) -> Response {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Rejecting unparsable POST body: {}", e);
            return rpc_error(StatusCode::BAD_REQUEST, McpError::Parse(e.to_string()));
        }
    };

    let (transport, created) = match session_id(headers) {
        Some(id) => match state.sessions.get(id) {
            Some(transport) => (transport, false),
            None => {
                warn!(session_id = id, "Rejecting request for unknown session");
                return session_error();
            }
        },
        None if is_initialize_request(&payload) => {
            (state.sessions.create(Arc::clone(&state.server)), true)
        }
        None => {
            warn!("Rejecting non-initialize request without session id");
            return session_error();
        }
    };
    debug!(session_id = transport.id(), "Routing request to session");

    let resolved = resolve_request_credential(headers, query, state.default_key.as_ref());
    if let Some(credential) = &resolved {
        debug!(source = %credential.source, "Resolved request credential");
    }
    let scope = CredentialScope::request(resolved);

    match transport.handle(payload, &scope).await {
        Ok(Some(response)) if created && response.get("error").is_some() => {
            // Failed initialize: the session never became usable
            transport.close();
            Json(response).into_response()
        }
        Ok(Some(response)) => {
            let mut http_response = Json(response).into_response();
            if created && let Ok(value) = HeaderValue::from_str(transport.id()) {
                http_response.headers_mut().insert(SESSION_HEADER, value);
            }
            http_response
        }
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(e) => {
            warn!("Session unavailable: {}", e);
            session_error()
        }
    }
}

fn handle_delete(state: &HttpState, headers: &HeaderMap) -> Response {
    match session_id(headers) {
        Some(id) if state.sessions.close(id) => StatusCode::NO_CONTENT.into_response(),
        _ => {
            warn!("Rejecting DELETE without a live session id");
            session_error()
        }
    }
}

async fn health(State(state): State<HttpState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.len(),
    }))
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

/// Header, then bearer header, then query parameter, then process default
fn resolve_request_credential(
    headers: &HeaderMap,
    query: &CredentialQuery,
    default_key: Option<&ApiKey>,
) -> Option<ResolvedCredential> {
    resolve_credential([
        (
            CredentialSource::Header,
            headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()),
        ),
        (CredentialSource::BearerHeader, bearer_token(headers)),
        (CredentialSource::QueryParameter, query.api_key.as_deref()),
        (CredentialSource::ProcessDefault, default_key.map(ApiKey::expose)),
    ])
}

fn rpc_error(status: StatusCode, error: impl Into<RpcError>) -> Response {
    (status, Json(JsonRpcResponse::error(None, error))).into_response()
}

fn session_error() -> Response {
    rpc_error(StatusCode::BAD_REQUEST, McpError::Session)
}

fn method_not_allowed() -> Response {
    let error = RpcError {
        code: codes::SESSION_ERROR,
        message: "Method not allowed.".to_string(),
        data: None,
    };
    let mut response = rpc_error(StatusCode::METHOD_NOT_ALLOWED, error);
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("POST, DELETE"));
    response
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Error handling request: {}", detail);
    rpc_error(StatusCode::INTERNAL_SERVER_ERROR, McpError::Internal)
}
