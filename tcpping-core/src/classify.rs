//! Raw-input classification.
//!
//! Maps whatever the user typed to one of five kinds, after stripping the
//! decorations people paste along with a host: surrounding whitespace, a URL
//! scheme, a path, and a port.
//!
//! IPv6 literals are recognized before the port strip: a bracketed literal
//! has its bracket contents extracted, and a bare candidate made of hex
//! digits and at least one colon classifies as IPv6 directly. Only the
//! remaining classes get the `:port` suffix removed first — otherwise a
//! bracket-less literal would be truncated at its first colon. This policy is
//! applied uniformly for every input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::unwrap_used)]
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap());

#[allow(clippy::unwrap_used)]
static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap());

// Deliberately loose: colon-delimited hex groups, not full RFC 4291.
#[allow(clippy::unwrap_used)]
static IPV6_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f:]+$").unwrap());

#[allow(clippy::unwrap_used)]
static HOSTNAME_DOTTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9-]+\.)+[A-Za-z]{2,}$").unwrap());

#[allow(clippy::unwrap_used)]
static HOSTNAME_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

/// What a piece of raw input looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Empty,
    Ipv4,
    Ipv6,
    Hostname,
    Invalid,
}

/// A classified input: the kind plus the stripped candidate text.
///
/// `target` is what a lookup should actually be issued against — e.g.
/// `"example.com"` for the input `"https://example.com/path"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedInput {
    pub kind: InputKind,
    pub target: String,
}

impl ClassifiedInput {
    fn new(kind: InputKind, target: &str) -> Self {
        Self {
            kind,
            target: target.to_string(),
        }
    }
}

/// Classify raw user input.
///
/// Pure and synchronous: the result is a deterministic function of the text
/// alone, recomputed on every call.
pub fn classify(raw: &str) -> ClassifiedInput {
    let mut candidate = raw.trim();
    if let Some(scheme) = SCHEME_RE.find(candidate) {
        candidate = &candidate[scheme.end()..];
    }
    if let Some(slash) = candidate.find('/') {
        candidate = &candidate[..slash];
    }

    // IPv6 before the port strip (see module docs).
    if let Some(rest) = candidate.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let inner = &rest[..end];
            if inner.contains(':') && IPV6_RE.is_match(inner) {
                return ClassifiedInput::new(InputKind::Ipv6, inner);
            }
        }
    } else if candidate.contains(':') && IPV6_RE.is_match(candidate) {
        return ClassifiedInput::new(InputKind::Ipv6, candidate);
    }

    if let Some(colon) = candidate.find(':') {
        candidate = &candidate[..colon];
    }

    if candidate.is_empty() {
        return ClassifiedInput::new(InputKind::Empty, candidate);
    }
    if IPV4_RE.is_match(candidate) {
        return ClassifiedInput::new(InputKind::Ipv4, candidate);
    }
    if HOSTNAME_DOTTED_RE.is_match(candidate) || HOSTNAME_LABEL_RE.is_match(candidate) {
        return ClassifiedInput::new(InputKind::Hostname, candidate);
    }
    ClassifiedInput::new(InputKind::Invalid, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(raw: &str) -> InputKind {
        classify(raw).kind
    }

    // ==================== kind tests ====================

    #[test]
    fn test_empty_input() {
        assert_eq!(kind(""), InputKind::Empty);
        assert_eq!(kind("   "), InputKind::Empty);
    }

    #[test]
    fn test_ipv4() {
        assert_eq!(kind("8.8.8.8"), InputKind::Ipv4);
        assert_eq!(kind("192.168.001.1"), InputKind::Ipv4);
    }

    #[test]
    fn test_ipv4_with_port() {
        let result = classify("1.2.3.4:8080");
        assert_eq!(result.kind, InputKind::Ipv4);
        assert_eq!(result.target, "1.2.3.4");
    }

    #[test]
    fn test_ipv6() {
        assert_eq!(kind("2001:db8::1"), InputKind::Ipv6);
        assert_eq!(kind("::1"), InputKind::Ipv6);
        assert_eq!(kind("fe80:0:0:0:0:0:0:1"), InputKind::Ipv6);
    }

    #[test]
    fn test_ipv6_bracketed_with_port() {
        let result = classify("[2001:db8::1]:443");
        assert_eq!(result.kind, InputKind::Ipv6);
        assert_eq!(result.target, "2001:db8::1");
    }

    #[test]
    fn test_hostname_dotted() {
        assert_eq!(kind("example.com"), InputKind::Hostname);
        assert_eq!(kind("a.b.example.co"), InputKind::Hostname);
    }

    #[test]
    fn test_hostname_single_label() {
        assert_eq!(kind("localhost"), InputKind::Hostname);
        assert_eq!(kind("my-host"), InputKind::Hostname);
    }

    #[test]
    fn test_invalid() {
        assert_eq!(kind("not a host!!"), InputKind::Invalid);
        assert_eq!(kind("a_b.example.com"), InputKind::Invalid);
        assert_eq!(kind("example.c"), InputKind::Invalid);
    }

    // ==================== stripping tests ====================

    #[test]
    fn test_scheme_and_path_stripped() {
        let result = classify("https://example.com/path");
        assert_eq!(result.kind, InputKind::Hostname);
        assert_eq!(result.target, "example.com");
    }

    #[test]
    fn test_port_stripped_from_hostname() {
        let result = classify("example.com:8443");
        assert_eq!(result.kind, InputKind::Hostname);
        assert_eq!(result.target, "example.com");
    }

    #[test]
    fn test_scheme_only_is_empty() {
        assert_eq!(kind("https://"), InputKind::Empty);
    }

    #[test]
    fn test_full_url_with_port_and_query() {
        let result = classify("http://sub.example.com:8080/path?q=1");
        assert_eq!(result.kind, InputKind::Hostname);
        assert_eq!(result.target, "sub.example.com");
    }

    // ==================== determinism ====================

    #[test]
    fn test_deterministic() {
        assert_eq!(classify("8.8.8.8"), classify("8.8.8.8"));
        assert_eq!(classify("  HTTPS://x.y/z "), classify("  HTTPS://x.y/z "));
    }
}
