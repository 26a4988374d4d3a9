//! Gateway address and the HTTP client used to reach action hosts.
//!
//! Every action host sits behind one gateway. Requests go to the gateway's
//! address and carry the logical action host in the `Host` header, so a
//! single address multiplexes any number of actions.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use http::StatusCode;
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http_body_util::{BodyExt, Full};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Longest body excerpt written to debug logs.
const LOG_BODY_LIMIT: usize = 2000;

/// Problems with the configured gateway address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway address is required to invoke actions (expected host:port)")]
    Missing,

    #[error("gateway address {0:?} is not of the form host:port")]
    Malformed(String),

    #[error("gateway address {0:?} has an invalid port")]
    InvalidPort(String),
}

/// Validated `host:port` of the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    host: String,
    port: u16,
}

impl Gateway {
    /// Parse a `host:port` pair. IPv6 hosts must be bracketed.
    pub fn parse(addr: &str) -> Result<Self, GatewayError> {
        let addr = addr.trim();
        if addr.is_empty() {
            return Err(GatewayError::Missing);
        }
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| GatewayError::Malformed(addr.to_string()))?;
        if !valid_host(host) {
            return Err(GatewayError::Malformed(addr.to_string()));
        }
        let port = port
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| GatewayError::InvalidPort(addr.to_string()))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Host without IPv6 brackets, as the resolver expects it.
    fn dial_host(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Gateway {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gateway::parse(s)
    }
}

/// Failure to complete an exchange with the gateway.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("failed to connect to gateway {gateway}: {source}")]
    Connect {
        gateway: String,
        source: std::io::Error,
    },

    #[error("HTTP error talking to gateway: {0}")]
    Http(#[from] hyper::Error),
}

/// Status and raw body of a gateway response.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl GatewayResponse {
    /// Body as text, for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends JSON POSTs through the gateway, one HTTP/1.1 connection per call.
///
/// No timeout and no retry are applied.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    gateway: Gateway,
}

impl GatewayClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// POST `body` as JSON to `/{path}` on the gateway with `Host: {host}`.
    pub async fn post_json<T: Serialize>(
        &self,
        host: &str,
        path: &str,
        body: &T,
    ) -> Result<GatewayResponse, TransportError> {
        let payload = serde_json::to_vec(body)?;
        let gateway = self.gateway.to_string();
        debug!(
            %gateway,
            %host,
            path,
            body = %truncate(&String::from_utf8_lossy(&payload), LOG_BODY_LIMIT),
            "sending POST through gateway"
        );

        let stream = tokio::net::TcpStream::connect((self.gateway.dial_host(), self.gateway.port()))
            .await
            .map_err(|source| TransportError::Connect {
                gateway: gateway.clone(),
                source,
            })?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "gateway connection closed with error");
            }
        });

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(format!("/{path}"))
            .header(HOST, host)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, "warpgrid-actions/0.1")
            .body(Full::new(Bytes::from(payload)))?;

        let resp = sender.send_request(req).await?;
        let status = resp.status();
        let body = resp.into_body().collect().await?.to_bytes();
        debug!(
            %status,
            %host,
            path,
            body = %truncate(&String::from_utf8_lossy(&body), LOG_BODY_LIMIT),
            "gateway response"
        );

        Ok(GatewayResponse { status, body })
    }
}

/// Non-empty, no whitespace or `/`, and a `:` only inside `[...]`.
fn valid_host(host: &str) -> bool {
    if host.is_empty() || host.contains('/') || host.chars().any(char::is_whitespace) {
        return false;
    }
    match host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        Some(inner) => !inner.is_empty() && !inner.contains(['[', ']']),
        None => !host.contains([':', '[', ']']),
    }
}

/// Cut `s` to at most `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
