//! Allowed-host validation
//!
//! Rejects requests whose host is not covered by the allowed hosts list.
//! Patterns: `*` matches anything, a leading dot (`.example.com`) matches the
//! domain and every subdomain, anything else must match exactly.

use crate::config::Settings;
use crate::utils::error::AppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Hosts accepted in debug mode when nothing is configured
const DEBUG_FALLBACK_HOSTS: [&str; 3] = [".localhost", "127.0.0.1", "[::1]"];

/// Allowed hosts, resolved once at router build time
#[derive(Debug, Clone)]
pub struct HostPolicy {
    patterns: Vec<String>,
}

impl HostPolicy {
    pub fn new(allowed_hosts: &[String], debug: bool) -> Self {
        let mut patterns: Vec<String> = allowed_hosts
            .iter()
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();

        if debug && patterns.is_empty() {
            patterns = DEBUG_FALLBACK_HOSTS.iter().map(|h| h.to_string()).collect();
        }

        Self { patterns }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.security.allowed_hosts, settings.security.debug)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check a raw `Host` value (port allowed)
    pub fn is_allowed(&self, raw_host: &str) -> bool {
        let domain = normalize_host(raw_host);
        if domain.is_empty() {
            return false;
        }

        self.patterns
            .iter()
            .any(|pattern| pattern == "*" || is_same_domain(&domain, pattern))
    }
}

/// Strip the port, lowercase and drop a trailing dot
pub fn normalize_host(raw_host: &str) -> String {
    let host = raw_host.trim().to_lowercase();

    let domain = if host.starts_with('[') {
        // IPv6 literal: keep the brackets, drop anything after them
        match host.find(']') {
            Some(end) => host[..=end].to_string(),
            None => return String::new(),
        }
    } else {
        match host.rsplit_once(':') {
            Some((name, _port)) => name.to_string(),
            None => host,
        }
    };

    domain.trim_end_matches('.').to_string()
}

/// `pattern` with a leading dot covers the bare domain and its subdomains
pub fn is_same_domain(host: &str, pattern: &str) -> bool {
    match pattern.strip_prefix('.') {
        Some(bare) => host == bare || host.ends_with(pattern),
        None => host == pattern,
    }
}

/// Host validation middleware
///
/// Uses the `Host` header, falling back to the URI authority. Requests that
/// carry neither pass through; a `Host` header that is not UTF-8 is rejected.
pub async fn allowed_hosts_middleware(
    State(policy): State<Arc<HostPolicy>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = match request.headers().get(header::HOST) {
        // A present but non-UTF-8 Host can never name an allowed host
        Some(value) => match value.to_str() {
            Ok(host) => Some(host.to_string()),
            Err(_) => {
                let rendered = String::from_utf8_lossy(value.as_bytes()).into_owned();
                return Err(AppError::DisallowedHost(rendered));
            }
        },
        None => request.uri().authority().map(|a| a.as_str().to_string()),
    };

    if let Some(host) = host {
        if !policy.is_allowed(&host) {
            return Err(AppError::DisallowedHost(host));
        }
        debug!("Host accepted: {}", host);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(hosts: &[&str], debug: bool) -> HostPolicy {
        let hosts: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
        HostPolicy::new(&hosts, debug)
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("LocalHost:8000"), "localhost");
        assert_eq!(normalize_host("example.com."), "example.com");
        assert_eq!(normalize_host("[::1]:8000"), "[::1]");
        assert_eq!(normalize_host("[::1"), "");
    }

    #[test]
    fn test_exact_match() {
        let policy = policy(&["localhost"], false);
        assert!(policy.is_allowed("localhost"));
        assert!(policy.is_allowed("localhost:8000"));
        assert!(!policy.is_allowed("example.com"));
        assert!(!policy.is_allowed("sub.localhost"));
    }

    #[test]
    fn test_subdomain_pattern() {
        let policy = policy(&[".example.com"], false);
        assert!(policy.is_allowed("example.com"));
        assert!(policy.is_allowed("api.example.com"));
        assert!(!policy.is_allowed("badexample.com"));
    }

    #[test]
    fn test_wildcard() {
        let policy = policy(&["*"], false);
        assert!(policy.is_allowed("anything.at.all"));
    }

    #[test]
    fn test_debug_fallback_only_when_empty() {
        let fallback = policy(&[], true);
        assert!(fallback.is_allowed("127.0.0.1:8000"));
        assert!(fallback.is_allowed("app.localhost"));

        let strict = policy(&[], false);
        assert!(!strict.is_allowed("127.0.0.1"));

        let configured = policy(&["localhost"], true);
        assert!(!configured.is_allowed("127.0.0.1"));
    }
}
