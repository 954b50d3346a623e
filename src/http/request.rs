//! Request translation.
//!
//! # Responsibilities
//! - Build the upstream target URL from the raw path and query
//! - Copy method, headers and body unchanged
//! - Inject the resolved client address as `X-Original-IP`
//!
//! # Design Decisions
//! - The URL is a plain string concatenation; nothing is decoded,
//!   re-encoded or normalized
//! - Repeated headers stay repeated, they are never comma-joined
//! - The outbound request always carries a body, empty when there was none

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderValue, Method, Uri},
};

use crate::config::UpstreamBase;
use crate::http::client_ip::{resolve_client_ip, UNKNOWN_CLIENT};

/// Header carrying the resolved client address to the upstream.
pub const X_ORIGINAL_IP: &str = "x-original-ip";

/// An inbound request with its body fully read.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Empty when the caller sent no body.
    pub body: Bytes,
    /// Transport peer, absent when the listener does not expose it.
    pub peer: Option<SocketAddr>,
}

impl IncomingRequest {
    pub fn client_ip(&self) -> String {
        resolve_client_ip(&self.headers, self.peer)
    }

    /// Raw path plus `?query` when the inbound URI had one.
    pub fn path_and_query(&self) -> String {
        match self.uri.query() {
            Some(query) => format!("{}?{}", self.uri.path(), query),
            None => self.uri.path().to_string(),
        }
    }
}

/// Concatenate the upstream base with the raw path and query.
pub fn build_target_url(base: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{base}{path}?{q}"),
        None => format!("{base}{path}"),
    }
}

/// The request sent to the upstream. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    target: String,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
}

impl OutboundRequest {
    /// Translate an inbound request for `upstream`, tagging it with `client_ip`.
    pub fn translate(incoming: IncomingRequest, upstream: &UpstreamBase, client_ip: &str) -> Self {
        let target = build_target_url(
            upstream.as_str(),
            incoming.uri.path(),
            incoming.uri.query(),
        );

        let mut headers = HeaderMap::with_capacity(incoming.headers.len() + 1);
        for (name, value) in incoming.headers.iter() {
            headers.append(name.clone(), value.clone());
        }
        let client_ip = HeaderValue::from_bytes(client_ip.as_bytes())
            .unwrap_or_else(|_| HeaderValue::from_static(UNKNOWN_CLIENT));
        headers.insert(X_ORIGINAL_IP, client_ip);

        Self {
            target,
            method: incoming.method,
            headers,
            body: incoming.body,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub(crate) fn into_parts(self) -> (String, Method, HeaderMap, Bytes) {
        (self.target, self.method, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn upstream() -> UpstreamBase {
        UpstreamBase::new_unchecked("http://upstream:9000".to_string())
    }

    fn incoming(request: Request<Bytes>) -> IncomingRequest {
        let (parts, body) = request.into_parts();
        IncomingRequest {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            peer: None,
        }
    }

    fn translate(request: Request<Bytes>, client_ip: &str) -> OutboundRequest {
        OutboundRequest::translate(incoming(request), &upstream(), client_ip)
    }

    #[test]
    fn target_without_query() {
        assert_eq!(build_target_url("http://u", "/a/b", None), "http://u/a/b");
    }

    #[test]
    fn target_keeps_encoding_verbatim() {
        let out = translate(
            Request::get("/files/a%20b/%2e%2e/c?q=%7Bx%7D&empty=&x=1+2")
                .body(Bytes::new())
                .unwrap(),
            "1.2.3.4",
        );
        assert_eq!(
            out.target(),
            "http://upstream:9000/files/a%20b/%2e%2e/c?q=%7Bx%7D&empty=&x=1+2"
        );
    }

    #[test]
    fn trailing_question_mark_is_kept() {
        let out = translate(Request::get("/search?").body(Bytes::new()).unwrap(), "1.2.3.4");
        assert_eq!(out.target(), "http://upstream:9000/search?");
    }

    #[test]
    fn path_and_query_for_logging() {
        let req = incoming(Request::get("/x/y?z=1").body(Bytes::new()).unwrap());
        assert_eq!(req.path_and_query(), "/x/y?z=1");
        let req = incoming(Request::get("/x/y").body(Bytes::new()).unwrap());
        assert_eq!(req.path_and_query(), "/x/y");
    }

    #[test]
    fn method_and_body_are_copied() {
        let out = translate(
            Request::builder()
                .method("PURGE")
                .uri("/")
                .body(Bytes::from_static(b"\xff\x00raw"))
                .unwrap(),
            "1.2.3.4",
        );
        assert_eq!(out.method().as_str(), "PURGE");
        assert_eq!(out.body().as_ref(), b"\xff\x00raw");
    }

    #[test]
    fn get_with_body_keeps_body() {
        let out = translate(
            Request::get("/").body(Bytes::from_static(b"payload")).unwrap(),
            "1.2.3.4",
        );
        assert_eq!(out.method(), Method::GET);
        assert_eq!(out.body().as_ref(), b"payload");
    }

    #[test]
    fn repeated_headers_stay_repeated() {
        let out = translate(
            Request::get("/")
                .header("accept", "text/html")
                .header("accept", "application/json")
                .header("x-custom", "v")
                .body(Bytes::new())
                .unwrap(),
            "1.2.3.4",
        );

        let accept: Vec<_> = out.headers().get_all("accept").iter().collect();
        assert_eq!(accept, vec!["text/html", "application/json"]);
        assert_eq!(out.headers()["x-custom"], "v");
        assert_eq!(out.headers().len(), 4);
    }

    #[test]
    fn original_ip_overwrites_inbound_values() {
        let out = translate(
            Request::get("/")
                .header("X-Original-IP", "6.6.6.6")
                .header("X-Original-IP", "7.7.7.7")
                .body(Bytes::new())
                .unwrap(),
            "10.0.0.5",
        );

        let values: Vec<_> = out.headers().get_all(X_ORIGINAL_IP).iter().collect();
        assert_eq!(values, vec!["10.0.0.5"]);
    }

    #[test]
    fn empty_client_ip_is_injected_as_is() {
        let out = translate(Request::get("/").body(Bytes::new()).unwrap(), "");
        assert_eq!(out.headers()[X_ORIGINAL_IP], "");
    }

    #[test]
    fn non_ascii_client_ip_is_injected() {
        let out = translate(Request::get("/").body(Bytes::new()).unwrap(), "caf\u{FFFD}-host");
        assert_eq!(
            out.headers()[X_ORIGINAL_IP].as_bytes(),
            "caf\u{FFFD}-host".as_bytes()
        );
    }

    #[test]
    fn client_ip_comes_from_the_request() {
        let mut req = incoming(
            Request::get("/")
                .header("x-forwarded-for", "10.0.0.5, 10.0.0.1")
                .body(Bytes::new())
                .unwrap(),
        );
        req.peer = Some("192.168.1.7:4000".parse().unwrap());
        assert_eq!(req.client_ip(), "10.0.0.5");
    }
}
