//! Upstream dispatch.
//!
//! # Responsibilities
//! - Send one translated request to the upstream
//! - Drain and drop the upstream response body
//! - Reduce the result to a bare status code for the caller
//!
//! # Design Decisions
//! - The client is shared by all requests and holds no per-request state
//! - No retries: one inbound request, at most one outbound attempt
//! - Transport failures never escape; they become 502 plus one error record
//! - Upstream headers and body are never relayed to the caller

use std::error::Error as StdError;
use std::time::Duration;

use axum::{
    body::Body,
    http::{uri::InvalidUri, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::ForwarderContext;
use crate::http::request::OutboundRequest;
use crate::resilience::timeouts::with_deadline;

/// Status returned to the caller when the upstream cannot be reached.
pub const GATEWAY_FAILURE: StatusCode = StatusCode::BAD_GATEWAY;

/// Result of forwarding one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The upstream answered; its status is passed through unchanged.
    Relayed(StatusCode),
    /// The upstream could not be reached or the exchange broke off.
    GatewayFailure,
}

impl ForwardOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardOutcome::Relayed(status) => *status,
            ForwardOutcome::GatewayFailure => GATEWAY_FAILURE,
        }
    }
}

impl IntoResponse for ForwardOutcome {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

/// Reasons an upstream call fails at the transport level.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid target URL: {0}")]
    InvalidTarget(#[from] InvalidUri),

    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("{}", describe(.0))]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream response: {0}")]
    ResponseBody(#[from] axum::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Render an error together with its source chain on one line.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Sends translated requests to the upstream.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client<HttpConnector, Body>,
    request_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(context: &ForwarderContext) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(context.connect_timeout());

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            request_timeout: context.request_timeout(),
        }
    }

    /// Forward `request` and map the result to a [`ForwardOutcome`].
    pub async fn dispatch(&self, request: OutboundRequest) -> ForwardOutcome {
        let target = request.target().to_string();

        let result = match with_deadline(self.request_timeout, self.call(request)).await {
            Ok(result) => result,
            Err(_) => Err(ForwardError::Timeout(self.request_timeout.unwrap_or_default())),
        };

        match result {
            Ok(status) => {
                tracing::debug!(url = %target, status = %status, "Upstream responded");
                ForwardOutcome::Relayed(status)
            }
            Err(e) => {
                tracing::error!(url = %target, error = %e, "Failed to forward request");
                ForwardOutcome::GatewayFailure
            }
        }
    }

    async fn call(&self, request: OutboundRequest) -> Result<StatusCode, ForwardError> {
        let (target, method, headers, body) = request.into_parts();

        let uri = Uri::try_from(target)?;
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body))?;
        *req.headers_mut() = headers;

        let response = self.client.request(req).await?;
        let status = response.status();

        let mut body = Body::new(response.into_body()).into_data_stream();
        while let Some(chunk) = body.next().await {
            chunk?;
        }

        Ok(status)
    }
}
