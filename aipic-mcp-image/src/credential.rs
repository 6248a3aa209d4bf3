//! Credential resolution and backend classification.
//!
//! A credential is an opaque string handed to us either as the `apiKey` tool
//! argument or through the environment. Its prefix decides which backend it
//! belongs to: ModelScope issues `ms-` tokens, DashScope issues `sk-` keys.

use aipic_mcp_common::error::Error;

/// Environment variables consulted for a default credential, in priority
/// order. The first present, non-empty value wins.
pub const CREDENTIAL_ENV_VARS: &[&str] = &["MODELSCOPE_API_KEY", "DASHSCOPE_API_KEY"];

/// The backend a credential routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// ModelScope inference API: one synchronous generation call.
    ModelScope,
    /// DashScope text2image API: async task submission plus status polling.
    DashScope,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::ModelScope => write!(f, "modelscope"),
            ProviderKind::DashScope => write!(f, "dashscope"),
        }
    }
}

/// Classify a credential by its prefix.
///
/// Returns `None` for formats that match neither backend; the caller decides
/// whether to reject or to attempt best-effort fallback.
pub fn classify(credential: &str) -> Option<ProviderKind> {
    if credential.starts_with("ms-") {
        Some(ProviderKind::ModelScope)
    } else if credential.starts_with("sk-") {
        Some(ProviderKind::DashScope)
    } else {
        None
    }
}

/// Resolve the effective credential for a request.
///
/// The explicit tool argument takes precedence; otherwise the environment
/// variables in [`CREDENTIAL_ENV_VARS`] are consulted in order.
///
/// # Errors
/// Returns `Error::Validation` when no credential can be resolved.
pub fn resolve(explicit: Option<&str>) -> Result<String, Error> {
    resolve_with(explicit, |name| std::env::var(name).ok())
}

/// Resolution logic with an injected environment lookup, so tests never have
/// to mutate process-wide environment variables.
fn resolve_with(
    explicit: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, Error> {
    if let Some(key) = explicit {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    for name in CREDENTIAL_ENV_VARS {
        if let Some(value) = lookup(name) {
            let value = value.trim();
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }
    }

    Err(Error::validation(format!(
        "No API key provided. Pass apiKey or set one of: {}",
        CREDENTIAL_ENV_VARS.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn explicit_key_wins() {
        let key = resolve_with(Some("ms-abc123"), |_| Some("sk-from-env".to_string())).unwrap();
        assert_eq!(key, "ms-abc123");
    }

    #[test]
    fn explicit_key_is_trimmed() {
        let key = resolve_with(Some("  sk-padded  "), no_env).unwrap();
        assert_eq!(key, "sk-padded");
    }

    #[test]
    fn blank_explicit_key_falls_through_to_env() {
        let key = resolve_with(Some("   "), |name| {
            (name == "DASHSCOPE_API_KEY").then(|| "sk-env".to_string())
        })
        .unwrap();
        assert_eq!(key, "sk-env");
    }

    #[test]
    fn env_order_is_significant() {
        // Both variables set: the first in the list wins.
        let key = resolve_with(None, |name| match name {
            "MODELSCOPE_API_KEY" => Some("ms-first".to_string()),
            "DASHSCOPE_API_KEY" => Some("sk-second".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(key, "ms-first");
    }

    #[test]
    fn empty_env_value_is_skipped() {
        let key = resolve_with(None, |name| match name {
            "MODELSCOPE_API_KEY" => Some(String::new()),
            "DASHSCOPE_API_KEY" => Some("sk-usable".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(key, "sk-usable");
    }

    #[test]
    fn missing_credential_is_a_validation_error() {
        let err = resolve_with(None, no_env).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("MODELSCOPE_API_KEY"));
    }

    #[test]
    fn classify_by_prefix() {
        assert_eq!(classify("ms-12345"), Some(ProviderKind::ModelScope));
        assert_eq!(classify("sk-12345"), Some(ProviderKind::DashScope));
        assert_eq!(classify("token-12345"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn provider_kind_display() {
        assert_eq!(ProviderKind::ModelScope.to_string(), "modelscope");
        assert_eq!(ProviderKind::DashScope.to_string(), "dashscope");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// An `ms-` credential never routes to the polling backend, and an
        /// `sk-` credential never routes to the direct one.
        #[test]
        fn prefix_routing_is_exclusive(suffix in "[A-Za-z0-9]{0,40}") {
            prop_assert_eq!(classify(&format!("ms-{}", suffix)), Some(ProviderKind::ModelScope));
            prop_assert_eq!(classify(&format!("sk-{}", suffix)), Some(ProviderKind::DashScope));
        }

        /// Credentials with neither prefix are never classified.
        #[test]
        fn unknown_prefixes_are_unclassified(key in "[A-Za-z0-9]{1,40}") {
            prop_assume!(!key.starts_with("ms-") && !key.starts_with("sk-"));
            prop_assert_eq!(classify(&key), None);
        }
    }
}
