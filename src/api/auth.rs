//! Authentication route handlers

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::auth::models::{LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, Role};
use crate::auth::{bearer_token, TokenIssuer};
use crate::error::{Error, Result};
use crate::mail::Mailer;
use crate::store::{NewUser, UserStore};

use super::server::SharedState;
use super::MessageResponse;

/// Authenticate a user and issue a session token.
///
/// Failures stay distinct: unknown user 404, wrong password 401,
/// unapproved Member 403, so the user knows to wait for approval rather
/// than retry a password.
pub async fn login_user(
    users: &dyn UserStore,
    issuer: &TokenIssuer,
    req: LoginRequest,
) -> Result<LoginResponse> {
    if req.identifier.trim().is_empty() || req.password.is_empty() {
        return Err(Error::Validation(
            "Username/email and password are required.".to_string(),
        ));
    }

    let user = users
        .find_by_identifier(&req.identifier)
        .await?
        .ok_or(Error::NotFound("User"))?;

    if !bcrypt::verify(&req.password, &user.password_hash)? {
        return Err(Error::BadPassword);
    }

    // Approval gates login only; administrative roles are never held back.
    if !user.approved && user.role == Role::Member {
        return Err(Error::NotApproved);
    }

    let token = issuer.issue(&user)?;
    Ok(LoginResponse {
        id: user.id,
        firstname: user.firstname,
        lastname: user.lastname,
        office: user.office,
        role: user.role,
        is_approved: user.approved,
        token,
    })
}

/// Create an account. Admin registrations are approved immediately; Members
/// wait for an administrator.
pub async fn register_user(users: &dyn UserStore, req: RegisterRequest) -> Result<()> {
    let required = [
        &req.title,
        &req.lastname,
        &req.firstname,
        &req.office,
        &req.username,
        &req.email,
        &req.password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(Error::Validation(
            "All required fields must be filled.".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
    users
        .create_user(NewUser {
            title: req.title,
            firstname: req.firstname,
            lastname: req.lastname,
            middlename: req.middlename,
            office: req.office,
            username: req.username,
            email: req.email,
            role: req.role,
            password_hash,
            approved: req.role == Role::Admin,
        })
        .await?;
    Ok(())
}

/// Exchange a valid, unexpired token for a fresh one.
///
/// The old token must still verify; an expired token cannot be refreshed.
/// Identity and role are re-read from the store rather than copied from the
/// old token, so a role change takes effect here. The approval flag is not
/// re-checked for the lifetime of a token.
pub async fn refresh_user_token(
    users: &dyn UserStore,
    issuer: &TokenIssuer,
    old_token: &str,
) -> Result<RefreshResponse> {
    let identity = issuer.verify(old_token)?;
    let user = users
        .find_by_id(identity.id)
        .await?
        .ok_or(Error::NotFound("User"))?;

    let token = issuer.issue(&user)?;
    Ok(RefreshResponse {
        id: user.id,
        firstname: user.firstname,
        lastname: user.lastname,
        office: user.office,
        role: user.role,
        token,
    })
}

// Axum handlers

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let resp = login_user(state.users.as_ref(), &state.issuer, req).await?;
    Ok(Json(resp))
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    register_user(state.users.as_ref(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully.")),
    ))
}

pub async fn refresh_token(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>> {
    let old_token = bearer_token(&headers)?;
    let resp = refresh_user_token(state.users.as_ref(), &state.issuer, old_token).await?;
    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    if req.email.trim().is_empty() {
        return Err(Error::Validation("Email is required".to_string()));
    }
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(Error::NotFound("User"))?;

    let token = format!("{:032x}", rand::random::<u128>());
    let expires = Utc::now() + Duration::minutes(state.config.auth.reset_token_minutes);
    state
        .users
        .set_reset_token(user.id, Some((token.clone(), expires)))
        .await?;

    let body = format!(
        "Reset your password using token:\n\n{}\n\nIf you didn't request this, ignore.",
        token
    );
    state
        .mailer
        .send(&user.email, "Password Reset", &body)
        .await?;

    Ok(Json(MessageResponse::new("Reset email sent")))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let user = state
        .users
        .find_by_reset_token(&token)
        .await?
        .filter(|u| u.reset_expires.is_some_and(|exp| exp > Utc::now()))
        .ok_or_else(|| Error::Validation("Token invalid or expired".to_string()))?;

    if req.password.is_empty() {
        return Err(Error::Validation("Password is required".to_string()));
    }

    let hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
    state.users.set_password_hash(user.id, hash).await?;
    state.users.set_reset_token(user.id, None).await?;

    Ok(Json(MessageResponse::new("Password reset successful")))
}
