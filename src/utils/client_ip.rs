use std::net::IpAddr;

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// First address listed in `X-Forwarded-For`, if any
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve the caller's address: proxy header first, then the socket peer.
pub fn resolve_client_ip(req: &HttpRequest) -> String {
    forwarded_for(req.headers())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn is_loopback(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => {
            v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
        Err(_) => false,
    }
}

/// Swap loopback addresses for `placeholder` so local traffic still looks
/// like a routable client downstream.
pub fn normalize_ip(ip: &str, placeholder: IpAddr) -> String {
    if is_loopback(ip) {
        placeholder.to_string()
    } else {
        ip.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn placeholder() -> IpAddr {
        "8.8.8.8".parse().unwrap()
    }

    #[test]
    fn loopback_addresses_are_replaced() {
        assert_eq!(normalize_ip("127.0.0.1", placeholder()), "8.8.8.8");
        assert_eq!(normalize_ip("::1", placeholder()), "8.8.8.8");
        assert_eq!(normalize_ip("::ffff:127.0.0.1", placeholder()), "8.8.8.8");
        assert_eq!(normalize_ip("127.1.2.3", placeholder()), "8.8.8.8");
    }

    #[test]
    fn other_addresses_are_kept() {
        assert_eq!(normalize_ip("203.0.113.9", placeholder()), "203.0.113.9");
        assert_eq!(normalize_ip("2001:db8::1", placeholder()), "2001:db8::1");
        assert_eq!(normalize_ip("unknown", placeholder()), "unknown");
    }

    #[test]
    fn forwarded_header_wins_over_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "198.51.100.4, 10.0.0.1"))
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_http_request();

        assert_eq!(resolve_client_ip(&req), "198.51.100.4");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "  "))
            .peer_addr("[::1]:5000".parse().unwrap())
            .to_http_request();

        assert_eq!(resolve_client_ip(&req), "::1");
    }

    #[test]
    fn unknown_without_header_or_peer() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(resolve_client_ip(&req), "unknown");
    }
}
