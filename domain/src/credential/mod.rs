//! Credential resolution
//!
//! An Opsgenie API key can come from several places depending on the
//! transport in use. Rather than keeping a mutable process-wide slot, callers
//! hand [`resolve_credential`] an ordered list of candidate sources and get
//! back the first one that is present.
//!
//! | Transport | Order |
//! |-----------|-------|
//! | stdio | tool argument → process default |
//! | HTTP | dedicated header → bearer header → query parameter → process default, then tool argument |
//!
//! The per-transport policy is captured by [`CredentialScope`].

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// An Opsgenie API key. The value is redacted from `Debug` output.
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wrap a raw key. Blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(SecretString::new(trimmed.to_string())))
        }
    }

    /// Borrow the raw key for placing it on an outbound request
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self(SecretString::new(self.0.expose_secret().clone()))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl PartialEq for ApiKey {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

/// Where a resolved credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `apiKey` tool argument
    Argument,
    /// Dedicated request header
    Header,
    /// `Authorization: Bearer ...`
    BearerHeader,
    /// Request query parameter
    QueryParameter,
    /// Key configured for the whole process (CLI flag, env var, config file)
    ProcessDefault,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Argument => "argument",
            CredentialSource::Header => "header",
            CredentialSource::BearerHeader => "bearer",
            CredentialSource::QueryParameter => "query",
            CredentialSource::ProcessDefault => "default",
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A credential together with the source it was taken from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCredential {
    pub source: CredentialSource,
    pub key: ApiKey,
}

/// Return the first present, non-blank candidate.
///
/// Candidates are tried in iteration order; `None` and blank values are skipped.
pub fn resolve_credential<'a, I>(candidates: I) -> Option<ResolvedCredential>
where
    I: IntoIterator<Item = (CredentialSource, Option<&'a str>)>,
{
    candidates.into_iter().find_map(|(source, value)| {
        value
            .and_then(ApiKey::new)
            .map(|key| ResolvedCredential { source, key })
    })
}

/// Credential policy for a single tool invocation.
#[derive(Debug, Clone, Default)]
pub enum CredentialScope {
    /// stdio: the tool argument wins, the process default is the fallback.
    Argument { default: Option<ApiKey> },
    /// HTTP: the request was already resolved (header → bearer → query →
    /// default) before dispatch; the tool argument is used only when that
    /// yielded nothing.
    Request { resolved: Option<ResolvedCredential> },
    /// No fallback at all; only the tool argument counts.
    #[default]
    ArgumentOnly,
}

impl CredentialScope {
    pub fn argument(default: Option<ApiKey>) -> Self {
        CredentialScope::Argument { default }
    }

    pub fn request(resolved: Option<ResolvedCredential>) -> Self {
        CredentialScope::Request { resolved }
    }

    /// Whether the transport owns the credential, making the `apiKey`
    /// argument optional for this call.
    pub fn supplies_credential(&self) -> bool {
        match self {
            CredentialScope::Argument { default } => default.is_some(),
            CredentialScope::Request { .. } => true,
            CredentialScope::ArgumentOnly => false,
        }
    }

    /// Resolve the credential for a call given its `apiKey` argument
    pub fn resolve(&self, argument: Option<&str>) -> Option<ResolvedCredential> {
        match self {
            CredentialScope::Argument { default } => resolve_credential([
                (CredentialSource::Argument, argument),
                (
                    CredentialSource::ProcessDefault,
                    default.as_ref().map(ApiKey::expose),
                ),
            ]),
            CredentialScope::Request { resolved } => resolved
                .clone()
                .or_else(|| resolve_credential([(CredentialSource::Argument, argument)])),
            CredentialScope::ArgumentOnly => resolve_credential([(CredentialSource::Argument, argument)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_absent() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert_eq!(ApiKey::new(" abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = ApiKey::new("super-secret").unwrap();
        assert!(!format!("{:?}", key).contains("super-secret"));
    }

    #[test]
    fn first_present_candidate_wins() {
        let resolved = resolve_credential([
            (CredentialSource::Header, None),
            (CredentialSource::BearerHeader, Some("bearer-key")),
            (CredentialSource::QueryParameter, Some("query-key")),
            (CredentialSource::ProcessDefault, Some("default-key")),
        ])
        .unwrap();
        assert_eq!(resolved.source, CredentialSource::BearerHeader);
        assert_eq!(resolved.key.expose(), "bearer-key");
    }

    #[test]
    fn all_absent_resolves_to_none() {
        assert!(
            resolve_credential([
                (CredentialSource::Header, None),
                (CredentialSource::QueryParameter, Some("")),
            ])
            .is_none()
        );
    }

    #[test]
    fn argument_scope_prefers_tool_argument() {
        let scope = CredentialScope::argument(ApiKey::new("default-key"));
        let resolved = scope.resolve(Some("arg-key")).unwrap();
        assert_eq!(resolved.source, CredentialSource::Argument);
        assert_eq!(resolved.key.expose(), "arg-key");

        let fallback = scope.resolve(None).unwrap();
        assert_eq!(fallback.source, CredentialSource::ProcessDefault);
        assert!(scope.supplies_credential());
    }

    #[test]
    fn request_scope_prefers_transport_resolution() {
        let resolved = resolve_credential([(CredentialSource::Header, Some("header-key"))]);
        let scope = CredentialScope::request(resolved);
        let key = scope.resolve(Some("arg-key")).unwrap();
        assert_eq!(key.source, CredentialSource::Header);

        let empty = CredentialScope::request(None);
        assert_eq!(empty.resolve(Some("arg-key")).unwrap().source, CredentialSource::Argument);
        assert!(empty.resolve(None).is_none());
        assert!(empty.supplies_credential());
    }

    #[test]
    fn bare_scope_requires_argument() {
        let scope = CredentialScope::ArgumentOnly;
        assert!(!scope.supplies_credential());
        assert!(scope.resolve(None).is_none());
    }
}
