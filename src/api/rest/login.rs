//! Login endpoint - records every submission
//!
//! There is no rejection path: whatever arrives (JSON, urlencoded form,
//! or nothing decodable) becomes an event. The event is queued for the
//! background writer and the response goes out after an artificial delay,
//! whether or not the write has finished.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequest, Request, State},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, USER_AGENT},
        HeaderMap, HeaderName,
    },
    Form, Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::api::state::AppState;
use crate::types::Event;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Submitted form fields
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

/// Accept any scalar and keep it as text
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }))
}

/// Body extractor that takes JSON or form data and never rejects
#[derive(Debug, Default)]
pub struct Submission(pub Credentials);

#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().starts_with("application/json"))
            .unwrap_or(false);

        let credentials = if is_json {
            Json::<Credentials>::from_request(req, state)
                .await
                .map(|Json(c)| c)
                .ok()
        } else {
            Form::<Credentials>::from_request(req, state)
                .await
                .map(|Form(c)| c)
                .ok()
        };

        Ok(Self(credentials.unwrap_or_default()))
    }
}

/// Candidate client addresses, in order of preference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressCandidates {
    /// Address as the platform sees it (nearest proxy hop when proxies are trusted)
    pub platform: Option<String>,
    /// Peer address of the TCP connection
    pub connection: Option<String>,
    /// Raw socket address, when the transport reports it separately
    pub socket: Option<String>,
    /// Raw `X-Forwarded-For` header
    pub forwarded_for: Option<String>,
    /// Raw `X-Real-IP` header
    pub real_ip: Option<String>,
}

impl AddressCandidates {
    /// Gather candidates from request headers and the peer address
    pub fn from_request(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Self {
        // A list of blank hops counts as no header
        let forwarded_for =
            header_value(headers, &X_FORWARDED_FOR).filter(|v| nearest_hop(v).is_some());
        let connection = peer.map(|addr| addr.ip().to_canonical().to_string());

        let platform = if trust_proxy {
            forwarded_for
                .as_deref()
                .and_then(nearest_hop)
                .or_else(|| connection.clone())
        } else {
            connection.clone()
        };

        Self {
            platform,
            connection,
            socket: None,
            forwarded_for,
            real_ip: header_value(headers, &X_REAL_IP),
        }
    }

    /// First non-empty candidate
    pub fn resolve(&self) -> Option<String> {
        [
            &self.platform,
            &self.connection,
            &self.socket,
            &self.forwarded_for,
            &self.real_ip,
        ]
        .into_iter()
        .flatten()
        .find(|addr| !addr.trim().is_empty())
        .cloned()
    }
}

/// Right-most entry of an `X-Forwarded-For` list, added by the nearest proxy
fn nearest_hop(forwarded_for: &str) -> Option<String> {
    forwarded_for
        .rsplit(',')
        .map(str::trim)
        .find(|hop| !hop.is_empty())
        .map(str::to_string)
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Response for POST /login
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub redirect: String,
}

impl LoginResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: "Login successful".to_string(),
            redirect: "/dashboard".to_string(),
        }
    }
}

/// Build the event for a submission
pub fn build_event(
    credentials: Credentials,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy: bool,
) -> Event {
    let addresses = AddressCandidates::from_request(headers, peer, trust_proxy);

    Event::builder()
        .identity(credentials.username)
        .secret(credentials.password)
        .source_address(addresses.resolve())
        .user_agent(header_value(headers, &USER_AGENT))
        .referrer(header_value(headers, &REFERER))
        .accept_language(header_value(headers, &ACCEPT_LANGUAGE))
        .build()
}

/// POST /login - Record a login attempt
///
/// Always answers with success after a random delay. The delay is an
/// async sleep, so other connections keep being served meanwhile.
pub async fn submit_login(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Submission(credentials): Submission,
) -> Json<LoginResponse> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let event = build_event(credentials, &headers, peer, state.config.trust_proxy);

    info!(
        target: "login_recorder::attempts",
        username = event.identity.as_deref().unwrap_or(""),
        ip = event.source_address.as_deref().unwrap_or(""),
        "New login attempt {}",
        event.summary()
    );

    state.appender.submit(event);

    tokio::time::sleep(state.config.login_delay.sample()).await;

    Json(LoginResponse::success())
}
