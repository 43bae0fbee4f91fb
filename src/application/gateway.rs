//! The request gateway: the one place API calls go through.
//!
//! Every call gets the stored credential attached, a near-expiry credential
//! refreshed first, and its response normalized into an [`Outcome`]. The
//! gateway never returns `Err` and never panics on a response.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use super::notifier::Notifier;
use super::session::SessionListener;
use crate::domain::{Credential, Freshness, HttpMethod, Outcome, RequestDescriptor, SessionEvent};
use crate::error::{ApiError, ErrorKind};
use crate::infrastructure::store::CredentialStore;
use crate::infrastructure::transport::{Transport, TransportRequest, TransportResponse};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const REFRESH_PATH: &str = "/refresh_token";

/// Static settings of a gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub auth_header: String,
    /// Response header carrying a rotated credential (`"<type> <token>"`).
    pub rotated_token_header: String,
    /// Optional companion header with the rotated credential's expiry.
    pub rotated_expiry_header: String,
    /// Seconds before expiry at which a credential gets refreshed.
    pub refresh_window_seconds: i64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:10088".to_string(),
            api_prefix: "/api/v1".to_string(),
            auth_header: "Authorization".to_string(),
            rotated_token_header: "X-Refresh-Token".to_string(),
            rotated_expiry_header: "X-Refresh-Token-Expires-At".to_string(),
            refresh_window_seconds: 600,
        }
    }
}

/// One executed call: the normalized outcome and the HTTP status it came with.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub outcome: Outcome,
    /// 0 when no response arrived.
    pub status: u16,
    notify: bool,
}

impl Exchange {
    /// The backend rejected the credential; `outcome` is an empty success.
    pub fn session_ended(&self) -> bool {
        self.status == 401
    }
}

pub struct RequestGateway {
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    listener: Arc<dyn SessionListener>,
    notifier: Arc<dyn Notifier>,
    refresh_lock: Mutex<()>,
}

impl RequestGateway {
    pub fn new(
        config: GatewayConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        listener: Arc<dyn SessionListener>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            listener,
            notifier,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Executes one call and normalizes its result.
    ///
    /// - 2xx: `Success(body)`; a rotated credential header or, for
    ///   descriptors that issue credentials, a token body is persisted
    /// - 401: the session listener is told once and `Success({})` is returned
    /// - anything else, or no response at all: `Failure`, notified unless
    ///   the descriptor sets `not_notify`
    pub async fn send(&self, descriptor: RequestDescriptor) -> Outcome {
        self.exchange(descriptor).await.outcome
    }

    /// Like [`send`](Self::send), decoding the payload into `T`.
    ///
    /// A 401 yields `Success(T::default())`. A payload that does not match
    /// `T` is a `Decode` failure, notified like any other failure.
    pub async fn fetch<T: DeserializeOwned + Default>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Outcome<T> {
        let exchange = self.exchange(descriptor).await;
        self.decode(exchange)
    }

    /// Decodes the payload of a finished exchange. See [`fetch`](Self::fetch).
    pub fn decode<T: DeserializeOwned + Default>(&self, exchange: Exchange) -> Outcome<T> {
        if exchange.session_ended() {
            return Outcome::Success(T::default());
        }

        let outcome = exchange.outcome.decode(exchange.status);
        if let Outcome::Failure(err) = &outcome
            && err.kind == ErrorKind::Decode
        {
            metrics::counter!("console_gateway_decode_failures_total").increment(1);
            if exchange.notify {
                self.notifier.notify(err);
            }
        }
        outcome
    }

    /// Executes one call, keeping the HTTP status next to the outcome.
    pub async fn exchange(&self, descriptor: RequestDescriptor) -> Exchange {
        let credential = if descriptor.skip_refresh {
            self.current_credential().await
        } else {
            self.refresh_if_needed().await
        };

        let (outcome, status, label) = match self.build_request(&descriptor, credential.as_ref()) {
            Ok(request) => {
                debug!("{} {}", request.method, request.url);
                match self.transport.execute(request).await {
                    Ok(response) => {
                        let status = response.status;
                        let (outcome, label) = self.classify(&descriptor, response).await;
                        (outcome, status, label)
                    }
                    Err(e) => {
                        warn!("{} {} failed: {}", descriptor.method, descriptor.route(), e);
                        let err = ApiError::not_connected(0);
                        let label = err.kind.as_str();
                        (Outcome::Failure(err), 0, label)
                    }
                }
            }
            Err(e) => {
                warn!("Cannot build URL for {}: {}", descriptor.route(), e);
                let err = ApiError::not_connected(0);
                let label = err.kind.as_str();
                (Outcome::Failure(err), 0, label)
            }
        };

        metrics::counter!("console_gateway_requests_total", "outcome" => label).increment(1);

        if let Outcome::Failure(err) = &outcome {
            if descriptor.not_notify {
                debug!("Failure on {} not notified: {}", descriptor.route(), err);
            } else {
                self.notifier.notify(err);
            }
        }

        Exchange {
            outcome,
            status,
            notify: !descriptor.not_notify,
        }
    }

    /// Fails a call that was never sent, notifying like any other failure.
    pub fn reject<T>(&self, error: ApiError) -> Outcome<T> {
        warn!("Call rejected before sending: {}", error);
        metrics::counter!("console_gateway_requests_total", "outcome" => error.kind.as_str())
            .increment(1);
        self.notifier.notify(&error);
        Outcome::Failure(error)
    }

    async fn classify(
        &self,
        descriptor: &RequestDescriptor,
        response: TransportResponse,
    ) -> (Outcome, &'static str) {
        let status = response.status;
        let body = parse_body(&response.body);

        match status {
            200..=299 => {
                self.persist_rotated(&response).await;
                if descriptor.issues_credential {
                    match serde_json::from_value::<Credential>(body.clone()) {
                        Ok(credential) => self.set_credential(credential).await,
                        Err(e) => warn!("{} returned no usable token: {}", descriptor.route(), e),
                    }
                }
                (Outcome::Success(body), "success")
            }
            401 => {
                info!("Credential rejected on {}", descriptor.route());
                self.listener.session_expired(SessionEvent::Expired {
                    path: descriptor.route(),
                });
                (Outcome::Success(json!({})), "session_expired")
            }
            _ => {
                let err = ApiError::from_status(status, Some(&body));
                warn!(
                    status,
                    code = err.code,
                    "{} {} failed: {}",
                    descriptor.method,
                    descriptor.route(),
                    err.message
                );
                let label = err.kind.as_str();
                (Outcome::Failure(err), label)
            }
        }
    }

    async fn persist_rotated(&self, response: &TransportResponse) {
        let Some(value) = response.header(&self.config.rotated_token_header) else {
            return;
        };

        let expires_at = response
            .header(&self.config.rotated_expiry_header)
            .and_then(|v| v.trim().parse::<i64>().ok());

        if let Some(credential) = Credential::from_header(value, expires_at) {
            debug!("Storing rotated credential");
            self.set_credential(credential).await;
        }
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        credential: Option<&Credential>,
    ) -> Result<TransportRequest, url::ParseError> {
        let url = self.url_for(&descriptor.path, &descriptor.segments, &descriptor.query)?;

        let auth = credential.map(Credential::header_value).unwrap_or_default();
        let mut headers = vec![(self.config.auth_header.clone(), auth)];

        let body = if descriptor.method.sends_json() {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
            descriptor.body.as_ref().map(Value::to_string)
        } else {
            None
        };

        Ok(TransportRequest {
            method: descriptor.method,
            url: url.to_string(),
            headers,
            body,
        })
    }

    /// Absolute URL of an API path, with `segments` percent-encoded onto the
    /// path and `query` appended.
    pub fn url_for(
        &self,
        path: &str,
        segments: &[String],
        query: &[(String, String)],
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!(
            "{}{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_prefix,
            path
        ))?;

        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithoutBase)?
                .pop_if_empty()
                .extend(segments);
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Header value for the stored credential, or `""` when there is none.
    pub async fn get_credential(&self) -> String {
        self.current_credential()
            .await
            .map(|c| c.header_value())
            .unwrap_or_default()
    }

    /// The stored credential. Store errors read as no credential.
    pub async fn current_credential(&self) -> Option<Credential> {
        match self.store.load().await {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Credential store read failed: {}", e);
                None
            }
        }
    }

    pub async fn set_credential(&self, credential: Credential) {
        if let Err(e) = self.store.save(&credential).await {
            warn!("Credential store write failed: {}", e);
        }
    }

    pub async fn clear_credential(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("Credential store clear failed: {}", e);
        }
    }

    /// Returns the credential to use for the next call, refreshing it first
    /// when it is about to expire.
    ///
    /// Concurrent callers serialize on one lock; only the first performs the
    /// refresh. A failed refresh keeps the current credential.
    pub async fn refresh_if_needed(&self) -> Option<Credential> {
        let window = self.config.refresh_window_seconds;

        let observed = self.current_credential().await?;
        if observed.freshness(window) != Freshness::NearExpiry {
            return Some(observed);
        }

        let _guard = self.refresh_lock.lock().await;

        let current = self.current_credential().await?;
        if current != observed || current.freshness(window) != Freshness::NearExpiry {
            debug!("Credential refreshed by another caller");
            return Some(current);
        }

        let descriptor = RequestDescriptor::new(HttpMethod::Post, REFRESH_PATH).skip_refresh();
        let request = match self.build_request(&descriptor, Some(&current)) {
            Ok(request) => request,
            Err(e) => {
                warn!("Cannot build refresh URL: {}", e);
                return Some(current);
            }
        };

        match self.transport.execute(request).await {
            Ok(response) if response.status == 200 => {
                match serde_json::from_str::<Credential>(&response.body) {
                    Ok(fresh) => {
                        info!("Credential refreshed");
                        metrics::counter!("console_gateway_refresh_total", "outcome" => "success")
                            .increment(1);
                        self.set_credential(fresh.clone()).await;
                        Some(fresh)
                    }
                    Err(e) => {
                        warn!("Refresh returned no usable token: {}", e);
                        Some(current)
                    }
                }
            }
            Ok(response) => {
                warn!("Refresh rejected with status {}", response.status);
                metrics::counter!("console_gateway_refresh_total", "outcome" => "rejected")
                    .increment(1);
                Some(current)
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                metrics::counter!("console_gateway_refresh_total", "outcome" => "unavailable")
                    .increment(1);
                Some(current)
            }
        }
    }
}

/// Empty body → `Null`, JSON → parsed, anything else → `String`.
fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
