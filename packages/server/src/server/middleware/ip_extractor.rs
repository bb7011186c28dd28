use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};

/// Caller address, logged with each direct debit request
#[derive(Clone, Debug)]
pub struct ClientIp(pub IpAddr);

/// Record the caller's address in the request extensions.
///
/// Proxy headers win over the socket peer: first hop of X-Forwarded-For,
/// then X-Real-IP. In-process tests have no peer and usually no headers,
/// in which case nothing is recorded.
pub async fn extract_client_ip(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers(), connect_info.map(|ConnectInfo(addr)| addr));

    if let Some(ip) = ip {
        request.extensions_mut().insert(ClientIp(ip));
    }

    next.run(request).await
}

fn client_ip(headers: &axum::http::HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        forwarded
            .to_str()
            .ok()
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    } else if let Some(real_ip) = headers.get("x-real-ip") {
        real_ip.to_str().ok().and_then(|s| s.trim().parse::<IpAddr>().ok())
    } else {
        peer.map(|addr| addr.ip())
    }
}
