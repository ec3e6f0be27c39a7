//! Request metadata recorded with an attendance

use actix_web::{http::header, HttpRequest};

use ev_core::RequestProvenance;

/// Longest user agent stored with an attendance
const MAX_USER_AGENT_LEN: usize = 512;

/// Client address from the connection and the `User-Agent` header
pub fn request_provenance(req: &HttpRequest) -> RequestProvenance {
    let ip_address = req.peer_addr().map(|addr| addr.ip().to_string());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|agent| agent.chars().take(MAX_USER_AGENT_LEN).collect());

    RequestProvenance::new(ip_address, user_agent)
}
