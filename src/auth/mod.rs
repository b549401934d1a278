//! Caller authentication
//!
//! Identity is established by the hosting platform; the relay only checks
//! that a bearer credential is present and, when digests are configured,
//! that it is one of the accepted tokens. Both adapters apply the same
//! policy.

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::RelayError;

/// Authentication policy shared by every entry point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthPolicy {
    /// Reject callers without a bearer token
    pub required: bool,
    /// SHA-256 hex digests of accepted tokens; empty accepts any token
    pub token_sha256: Vec<String>,
}

/// An authenticated caller, identified by a digest of its token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub token_digest: String,
}

impl AuthPolicy {
    /// Check the request headers against the policy.
    ///
    /// Returns `Ok(None)` for anonymous callers when auth is not required.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Option<Caller>, RelayError> {
        let caller = bearer_token(headers).map(|token| Caller {
            token_digest: hash_token(token),
        });

        if !self.required {
            return Ok(caller);
        }

        let caller = caller.ok_or(RelayError::Unauthenticated)?;
        if self.token_sha256.is_empty()
            || self
                .token_sha256
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&caller.token_digest))
        {
            Ok(Some(caller))
        } else {
            Err(RelayError::Unauthenticated)
        }
    }
}

/// Extract a non-empty bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Hash a token for comparison with configured digests
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(auth) = auth {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        }
        headers
    }

    #[test]
    fn test_token_hash_deterministic() {
        let hash1 = hash_token("secret123");
        let hash2 = hash_token("secret123");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_token("secret124"));
    }

    #[test]
    fn test_not_required_allows_anonymous() {
        let policy = AuthPolicy::default();
        assert_eq!(policy.authorize(&headers(None)).unwrap(), None);
        assert!(policy.authorize(&headers(Some("Bearer abc"))).unwrap().is_some());
    }

    #[test]
    fn test_required_rejects_missing_or_malformed() {
        let policy = AuthPolicy {
            required: true,
            token_sha256: vec![],
        };
        assert!(matches!(
            policy.authorize(&headers(None)),
            Err(RelayError::Unauthenticated)
        ));
        assert!(policy.authorize(&headers(Some("Basic dXNlcjpwdw=="))).is_err());
        assert!(policy.authorize(&headers(Some("Bearer   "))).is_err());

        // Any token is accepted when no digests are configured
        let caller = policy.authorize(&headers(Some("bearer id-token"))).unwrap();
        assert_eq!(caller.unwrap().token_digest, hash_token("id-token"));
    }

    #[test]
    fn test_required_with_digests() {
        let policy = AuthPolicy {
            required: true,
            token_sha256: vec![hash_token("good").to_uppercase()],
        };
        assert!(policy.authorize(&headers(Some("Bearer good"))).is_ok());
        assert!(policy.authorize(&headers(Some("Bearer bad"))).is_err());
    }
}
