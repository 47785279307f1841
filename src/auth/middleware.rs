//! Authentication middleware and extractors

use crate::api::server::SharedState;
use crate::auth::models::AuthUser;
use crate::auth::policy;
use crate::error::{Error, Result};
use crate::store::UserStore;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

/// Pull the bearer token out of the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::MissingCredential)
}

/// Verify a token and establish the caller's identity.
///
/// Re-reads the caller's record from the store (a read-through on every
/// request, so display fields are never stale). A token whose subject no
/// longer exists is treated as a dead credential, not a missing resource;
/// the caller gets the same generic 401 as any other invalid token.
/// Verification failures are logged with their precise reason; the
/// response body stays generic.
pub async fn resolve_auth_user(state: &crate::api::server::AppState, token: &str) -> Result<AuthUser> {
    let identity = state.issuer.verify(token).map_err(|e| {
        match &e {
            Error::ExpiredCredential => tracing::debug!("rejected expired token"),
            Error::InvalidCredential(reason) => {
                tracing::warn!(%reason, "rejected invalid token")
            }
            _ => {}
        }
        e
    })?;

    // A store failure here is a server error, never an implicit denial.
    let user = state
        .users
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(subject = %identity.id, "rejected token for deleted account");
            Error::InvalidCredential("subject no longer exists".to_string())
        })?;

    Ok(AuthUser {
        id: user.id,
        role: identity.role,
        firstname: user.firstname,
        lastname: user.lastname,
        office: user.office,
    })
}

/// Gate for protected routes: verifies the bearer token and attaches the
/// established [`AuthUser`] to the request.
pub async fn authenticate(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(req.headers())?;
    let caller = resolve_auth_user(&state, token).await?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

/// Additional gate for administrative routes. Runs after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response> {
    let caller = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(Error::MissingCredential)?;
    if !policy::can_manage_users(caller.role) {
        return Err(Error::Forbidden);
    }
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(Error::MissingCredential)
    }
}
