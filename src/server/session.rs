//! Session resolution seam for the auth-context bridge.
//!
//! The identity provider itself is an external subsystem; the bridge only
//! consumes a stable subject identifier per request. `SessionResolver` is the
//! trait boundary so the router can be tested without any OIDC machinery.

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::errors::SessionError;

/// Header carrying the verified subject, populated by the OIDC fronting
/// layer before requests reach this service.
pub const SUBJECT_HEADER: &str = "x-auth-subject";

/// The authenticated caller. Only the stable subject identifier is consumed;
/// the rest of the claim set stays with the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

/// Resolve the caller's session from an incoming request.
///
/// `Ok(None)` and `Err(SessionError::Unauthenticated)` both mean "anonymous";
/// the split lets implementations distinguish "no credentials at all" from
/// "credentials present but rejected", which the bridge logs differently.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, SessionError>;
}

/// Production resolver: trust the subject header injected by the
/// authenticating reverse proxy.
pub struct TrustedHeaderResolver;

#[async_trait]
impl SessionResolver for TrustedHeaderResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, SessionError> {
        let Some(value) = headers.get(SUBJECT_HEADER) else {
            return Ok(None);
        };
        let subject = value
            .to_str()
            .map_err(|_| SessionError::MalformedClaims("subject header is not UTF-8".into()))?
            .trim();
        if subject.is_empty() {
            return Err(SessionError::Unauthenticated);
        }
        Ok(Some(Identity {
            subject: subject.to_string(),
        }))
    }
}
