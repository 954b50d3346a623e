//! Client identity resolution.
//!
//! # Responsibilities
//! - Pick the originating client address for a request
//! - Prefer the first `X-Forwarded-For` hop over the transport peer
//! - Never fail: degrade to [`UNKNOWN_CLIENT`]

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{request::Parts, HeaderMap};

/// Forwarding header consulted before the peer address.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Sentinel used when no identity signal is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the client address from the inbound headers and the peer address.
///
/// Priority, first match wins:
/// 1. first comma separated entry of the first `X-Forwarded-For` value, trimmed
/// 2. IP of the transport peer (no port)
/// 3. `"unknown"`
///
/// A forwarding header whose first entry is empty (e.g. `", 10.0.0.1"`) is
/// honored as-is and yields an empty string. Bytes outside UTF-8 are
/// replaced, never dropped.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .map(|value| value.as_bytes())
        .filter(|value| !value.is_empty());

    if let Some(value) = forwarded {
        let first = value.split(|b| *b == b',').next().unwrap_or_default();
        return String::from_utf8_lossy(first.trim_ascii()).into_owned();
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

/// Transport peer address, if the server was started with connect info.
///
/// Unlike `ConnectInfo` this never rejects: routers served without
/// `into_make_service_with_connect_info` simply yield `None`.
#[derive(Debug, Clone, Copy)]
pub struct PeerAddr(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for PeerAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        ))
    }
}
