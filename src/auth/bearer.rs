use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::auth::CredentialVerifier;

/// Pre-shared bearer token compared literally against `Authorization`.
#[derive(Clone)]
pub struct StaticBearerToken {
    expected: String,
}

impl StaticBearerToken {
    pub fn new(token: &str) -> Self {
        Self {
            expected: format!("Bearer {}", token),
        }
    }
}

impl std::fmt::Debug for StaticBearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticBearerToken").finish_non_exhaustive()
    }
}

impl CredentialVerifier for StaticBearerToken {
    fn verify(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|auth_val| auth_val == self.expected)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_exact_match_is_accepted() {
        let verifier = StaticBearerToken::new("mysecrettoken");
        assert!(verifier.verify(&headers_with("Bearer mysecrettoken")));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let verifier = StaticBearerToken::new("mysecrettoken");
        assert!(!verifier.verify(&HeaderMap::new()));
    }

    #[test]
    fn test_near_misses_are_rejected() {
        let verifier = StaticBearerToken::new("mysecrettoken");
        for value in [
            "Bearer wrongtoken",
            "bearer mysecrettoken",
            "Bearer  mysecrettoken",
            "Bearer mysecrettoken ",
            "mysecrettoken",
            "Basic bXlzZWNyZXR0b2tlbg==",
        ] {
            assert!(!verifier.verify(&headers_with(value)), "accepted {:?}", value);
        }
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let verifier = StaticBearerToken::new("mysecrettoken");
        assert!(!format!("{:?}", verifier).contains("mysecrettoken"));
    }
}
