//! Basic-auth gate.
//!
//! Active only when `ENABLE_AUTH=true`. The staging host and its subdomains
//! are protected entirely; every other host only protects paths under the
//! configured prefix.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;

use crate::config::AuthConfig;

pub const REALM_CHALLENGE: &str = r#"Basic realm="Secure Area", charset="UTF-8""#;

pub async fn basic_auth(
    State(config): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if !config.enabled {
        return next.run(request).await;
    }

    let host = request_host(request.headers());
    let path = request.uri().path().to_string();
    if !requires_auth(&config, &host, &path) {
        return next.run(request).await;
    }

    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if credentials_match(&config, authorization) {
        next.run(request).await
    } else {
        tracing::debug!(host = %host, path = %path, "Rejected unauthenticated request");
        unauthorized()
    }
}

pub fn requires_auth(config: &AuthConfig, host: &str, path: &str) -> bool {
    if !config.enabled {
        return false;
    }
    let staging = host == config.staging_host
        || host
            .strip_suffix(config.staging_host.as_str())
            .is_some_and(|rest| rest.ends_with('.'));
    staging || path.starts_with(&config.protected_prefix)
}

/// `Basic <base64(user:pass)>` with both parts equal to the configured values.
pub fn credentials_match(config: &AuthConfig, authorization: Option<&str>) -> bool {
    let Some((scheme, encoded)) = authorization.and_then(|h| h.split_once(' ')) else {
        return false;
    };
    if scheme != "Basic" || encoded.is_empty() {
        return false;
    }
    let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(encoded) else {
        return false;
    };
    let decoded = String::from_utf8_lossy(&decoded);
    match decoded.split_once(':') {
        Some((user, pass)) => user == config.user && pass == config.pass,
        None => false,
    }
}

/// Hostname from the Host header, without port.
pub fn request_host(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    host.to_ascii_lowercase()
}

fn unauthorized() -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, "Auth required").into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static(REALM_CHALLENGE),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            enabled: true,
            user: "admin".to_string(),
            pass: "pa:ss".to_string(),
            ..AuthConfig::default()
        }
    }

    fn basic(user_pass: &str) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(user_pass)
        )
    }

    #[test]
    fn test_staging_host_fully_protected() {
        let c = config();
        assert!(requires_auth(&c, "staging.dreaminsight.co.kr", "/"));
        assert!(requires_auth(&c, "preview.staging.dreaminsight.co.kr", "/health"));
        assert!(!requires_auth(&c, "evilstaging.dreaminsight.co.kr", "/"));
    }

    #[test]
    fn test_other_hosts_protect_prefix_only() {
        let c = config();
        assert!(!requires_auth(&c, "dreaminsight.co.kr", "/"));
        assert!(!requires_auth(&c, "dreaminsight.co.kr", "/api/diag"));
        assert!(requires_auth(&c, "dreaminsight.co.kr", "/app/api/analyze"));
    }

    #[test]
    fn test_disabled_gate_protects_nothing() {
        let c = AuthConfig::default();
        assert!(!requires_auth(&c, "staging.dreaminsight.co.kr", "/app"));
    }

    #[test]
    fn test_credentials() {
        let c = config();
        // Password may itself contain ':'
        assert!(credentials_match(&c, Some(basic("admin:pa:ss").as_str())));
        assert!(!credentials_match(&c, Some(basic("admin:wrong").as_str())));
        assert!(!credentials_match(&c, Some(basic("adminpass").as_str())));
        assert!(!credentials_match(&c, Some("Bearer abc")));
        assert!(!credentials_match(&c, Some("Basic !!!not-base64")));
        assert!(!credentials_match(&c, None));
    }

    #[test]
    fn test_request_host_strips_port() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::HOST,
            HeaderValue::from_static("Staging.DreamInsight.co.kr:8443"),
        );
        assert_eq!(request_host(&headers), "staging.dreaminsight.co.kr");
        assert_eq!(request_host(&HeaderMap::new()), "");
    }
}
