//! reqwest implementation of [`Fetcher`].

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;
use tracing::{debug, error};

use cqhttp_core::{Fetcher, HttpClientConfig, Params, SessionMode, TransportError, TransportResult};

/// HTTP transport for gateway calls.
///
/// With [`SessionMode::PerCall`] every request builds its own client and
/// nothing outlives the call. With [`SessionMode::Pooled`] one client is
/// built up front and cloned into each call, so keep-alive connections are
/// reused.
pub struct Fetch {
    timeout: Duration,
    pooled: Option<Client>,
}

impl Fetch {
    /// Creates a transport from the client configuration.
    pub fn new(config: &HttpClientConfig) -> TransportResult<Self> {
        let pooled = match config.session {
            SessionMode::Pooled => Some(build_client(config.timeout)?),
            SessionMode::PerCall => None,
        };
        Ok(Self {
            timeout: config.timeout,
            pooled,
        })
    }

    /// Returns the session policy in effect.
    pub fn session_mode(&self) -> SessionMode {
        if self.pooled.is_some() {
            SessionMode::Pooled
        } else {
            SessionMode::PerCall
        }
    }

    /// Returns the client to use for one call.
    fn session(&self) -> TransportResult<Client> {
        match &self.pooled {
            Some(client) => Ok(client.clone()),
            None => build_client(self.timeout),
        }
    }
}

fn build_client(timeout: Duration) -> TransportResult<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .build()
        .map_err(|e| TransportError::Client(e.to_string()))
}

fn request_failed(url: &str, err: reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

/// Shared completion path for both verbs: read the body as UTF-8, log the
/// exchange, reject error statuses, then decode.
async fn complete(
    url: &str,
    request: &(dyn Debug + Sync),
    response: Response,
) -> TransportResult<Option<Value>> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| request_failed(url, e))?;
    let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
        error!(url = %url, request = ?request, error = %e, "Gateway response is not valid UTF-8");
        TransportError::Request {
            url: url.to_string(),
            reason: format!("response body is not valid UTF-8: {e}"),
        }
    })?;

    debug!(
        url = %url,
        request = ?request,
        status = status.as_u16(),
        body = %body,
        "Gateway request completed"
    );

    if status.is_client_error() || status.is_server_error() {
        error!(url = %url, status = status.as_u16(), "Gateway returned an error status");
        return Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            error!(
                url = %url,
                request = ?request,
                body = %body,
                error = %e,
                "Gateway response decode failed"
            );
            Ok(None)
        }
    }
}

#[async_trait]
impl Fetcher for Fetch {
    async fn http_post(&self, url: &str, payload: Option<&Value>) -> TransportResult<Option<Value>> {
        let mut req = self.session()?.post(url);
        if let Some(body) = payload {
            req = req.json(body);
        }
        let response = req.send().await.map_err(|e| request_failed(url, e))?;
        complete(url, &payload, response).await
    }

    async fn http_get(&self, url: &str, params: Option<&Params>) -> TransportResult<Option<Value>> {
        let mut req = self.session()?.get(url);
        if let Some(query) = params {
            req = req.query(query);
        }
        let response = req.send().await.map_err(|e| request_failed(url, e))?;
        complete(url, &params, response).await
    }
}
