//! HTTP response adapters between the router and `tiny_http`.

use super::router::RouteResponse;
use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

/// Send a routed response back on the wire.
pub fn respond(request: Request, response: RouteResponse) -> Result<()> {
    let mut http = Response::from_data(response.body)
        .with_status_code(StatusCode(response.status))
        .with_header(make_header("Content-Type", response.content_type));

    if let Some(cookie) = &response.set_cookie {
        http = http.with_header(
            Header::from_bytes("Set-Cookie", cookie.as_bytes()).expect("valid cookie header"),
        );
    }

    request.respond(http)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;
    let response = Response::from_data(b"503 Service Unavailable".to_vec())
        .with_status_code(StatusCode(503))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
