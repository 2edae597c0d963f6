//! Auth-context bridge middleware.
//!
//! For requests under the API prefix, resolve the caller's session and make
//! the identity available in two places: request extensions (for handlers)
//! and, when a database pool is configured, a transaction-local Postgres
//! setting read by row-level-security policies. Everything here is
//! best-effort: an unauthenticated caller is simply anonymous, and resolver
//! failures are logged without blocking the request.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Extensions, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::errors::SessionError;
use crate::server::SharedState;
use crate::server::rls::RequestScope;
use crate::server::session::Identity;

/// Path prefix the bridge applies to; everything else passes through.
pub const API_PREFIX: &str = "/api";

/// Constant-time accessor for the identity stored by the bridge.
pub fn identity(extensions: &Extensions) -> Option<&Identity> {
    extensions.get::<Identity>()
}

/// Accessor for the request's RLS-bound database scope, if one was opened.
pub fn request_scope(extensions: &Extensions) -> Option<&RequestScope> {
    extensions.get::<RequestScope>()
}

fn is_api_path(path: &str) -> bool {
    path == API_PREFIX || path.starts_with("/api/")
}

pub async fn auth_context(
    State(state): State<SharedState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !is_api_path(request.uri().path()) {
        return next.run(request).await;
    }

    let identity = match state.resolver.resolve(request.headers()).await {
        Ok(identity) => identity,
        // Anonymous by design: many API routes are public.
        Err(SessionError::Unauthenticated) => None,
        Err(e) => {
            tracing::warn!(error = %e, "session resolution failed; continuing anonymously");
            None
        }
    };

    let mut scope = None;
    if let Some(identity) = identity {
        if let Some(pool) = &state.pool {
            match RequestScope::open(pool, &identity.subject).await {
                Ok(opened) => {
                    request.extensions_mut().insert(opened.clone());
                    scope = Some(opened);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to bind RLS subject; request proceeds without database scope");
                }
            }
        }
        request.extensions_mut().insert(identity);
    }

    let response = next.run(request).await;

    if let Some(scope) = scope
        && let Err(e) = scope.commit().await
    {
        tracing::warn!(error = %e, "failed to commit request scope");
    }

    response
}
