//! Subdomain resolution and validation.
//!
//! Two reserved lists exist on purpose. The routing list is what the
//! host resolver skips when deciding whether an inbound request
//! targets a tenant site; the registration list is the larger set an
//! organization may not claim as its subdomain. A name such as `docs`
//! is routable but not registrable. The divergence comes from the
//! product surface and is kept as two named constants rather than
//! merged; reconciling them is a product decision, not a code one.

use std::sync::LazyLock;

use regex::Regex;

/// Labels the host resolver treats as the main domain.
pub const ROUTING_RESERVED: &[&str] = &["www", "api", "admin", "app", "mail", "ftp"];

/// Labels organizations may not register. Superset of
/// [`ROUTING_RESERVED`].
pub const REGISTRATION_RESERVED: &[&str] = &[
    "www", "api", "admin", "app", "mail", "ftp", "blog", "docs", "support", "help", "status",
    "staging", "dev", "test",
];

static SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{1,61}[a-z0-9])?$").expect("static regex should not panic")
});

/// Where an inbound host name points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostScope {
    /// Main application domain, no tenant selected.
    Main,
    /// Tenant site addressed by this organization slug.
    Tenant(String),
}

/// Resolve an inbound `Host` header value to a scope.
///
/// Purely syntactic: split on `.`, and with three or more labels the
/// first one is a subdomain candidate unless it is in
/// [`ROUTING_RESERVED`]. No DNS, certificate, or punycode handling.
pub fn resolve_host(host: &str) -> HostScope {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 3 {
        let candidate = labels[0];
        if !ROUTING_RESERVED.contains(&candidate) {
            return HostScope::Tenant(candidate.to_string());
        }
    }
    HostScope::Main
}

/// Whether a subdomain is acceptable for organization registration:
/// 3-63 chars, lowercase alphanumeric with interior hyphens, and not
/// in [`REGISTRATION_RESERVED`]. The caller is expected to lowercase
/// before storing; validation lowercases for the check itself.
pub fn is_valid_subdomain(subdomain: &str) -> bool {
    let lowered = subdomain.to_lowercase();
    subdomain.len() >= 3
        && subdomain.len() <= 63
        && SUBDOMAIN_RE.is_match(&lowered)
        && !REGISTRATION_RESERVED.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_label_host_resolves_to_tenant() {
        assert_eq!(
            resolve_host("acme.example.com"),
            HostScope::Tenant("acme".into())
        );
    }

    #[test]
    fn two_label_host_is_main_domain() {
        assert_eq!(resolve_host("example.com"), HostScope::Main);
    }

    #[test]
    fn routing_reserved_labels_fall_through_to_main() {
        assert_eq!(resolve_host("www.example.com"), HostScope::Main);
        assert_eq!(resolve_host("api.example.com"), HostScope::Main);
    }

    /// `docs` routes as a tenant but is not registrable. The two
    /// reserved lists intentionally diverge.
    #[test]
    fn docs_routes_but_does_not_register() {
        assert_eq!(
            resolve_host("docs.acme.example.com"),
            HostScope::Tenant("docs".into())
        );
        assert!(!is_valid_subdomain("docs"));
    }

    #[test]
    fn valid_subdomains_pass() {
        assert!(is_valid_subdomain("acme"));
        assert!(is_valid_subdomain("acme-corp"));
        assert!(is_valid_subdomain("a1b"));
    }

    #[test]
    fn format_violations_fail() {
        assert!(!is_valid_subdomain("ab")); // too short
        assert!(!is_valid_subdomain("-acme")); // leading hyphen
        assert!(!is_valid_subdomain("acme-")); // trailing hyphen
        assert!(!is_valid_subdomain("ac me")); // whitespace
        assert!(!is_valid_subdomain(&"a".repeat(64))); // too long
    }

    #[test]
    fn registration_reserved_names_fail() {
        for name in REGISTRATION_RESERVED {
            assert!(!is_valid_subdomain(name), "{name} must be rejected");
        }
    }

    #[test]
    fn validation_is_case_insensitive() {
        assert!(is_valid_subdomain("Acme"));
        assert!(!is_valid_subdomain("Docs"));
    }
}
