//! Client-side session lifecycle
//!
//! Keeps a session usable across its token's TTL through silent refresh and
//! enforces an inactivity cutoff. All state is scoped to the
//! [`SessionManager`] instance, so concurrent sessions (tests, multiple
//! windows) cannot corrupt each other.
//!
//! Server-side verification remains the sole source of truth; everything
//! here, including the unverified expiry decode, is a UX convenience.

use crate::auth::models::{LoginResponse, RefreshResponse, Role};
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// The client-held session: identity subset plus the raw token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub office: String,
    pub role: Role,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn from_login(resp: &LoginResponse) -> Result<Self> {
        Ok(Self {
            user_id: resp.id,
            firstname: resp.firstname.clone(),
            lastname: resp.lastname.clone(),
            office: resp.office.clone(),
            role: resp.role,
            token: resp.token.clone(),
            expires_at: decode_expiry_unverified(&resp.token)?,
        })
    }
}

/// Read the expiry embedded in a token without checking the signature.
///
/// The client cannot verify signatures; this is informational only and
/// never an authorization decision.
pub fn decode_expiry_unverified(token: &str) -> Result<DateTime<Utc>> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| Error::InvalidCredential("not a three-part token".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| Error::InvalidCredential("undecodable token payload".to_string()))?;

    #[derive(serde::Deserialize)]
    struct ExpOnly {
        exp: i64,
    }
    let claims: ExpOnly = serde_json::from_slice(&bytes)
        .map_err(|_| Error::InvalidCredential("token payload is not JSON".to_string()))?;
    Utc.timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| Error::InvalidCredential("expiry out of range".to_string()))
}

/// Transport used for silent refresh; a trait so tests can run without a
/// server.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, token: &str) -> Result<RefreshResponse>;
}

/// Refreshes against the service's `/api/refresh-token` endpoint.
pub struct HttpTokenRefresher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTokenRefresher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, token: &str) -> Result<RefreshResponse> {
        let resp = self
            .client
            .post(format!("{}/api/refresh-token", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Error::InvalidCredential(format!(
                "refresh rejected with status {}",
                resp.status()
            )));
        }
        Ok(resp.json::<RefreshResponse>().await?)
    }
}

/// Result of a [`SessionManager::maybe_refresh`] check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing to do, no live session
    NoSession,
    /// Token has enough time left
    NotDue,
    /// Another refresh is already in flight; this trigger was dropped
    InFlight,
    /// A new token was installed
    Refreshed,
    /// Refresh completed after logout; the result was discarded
    Discarded,
    /// Token already expired or refresh failed; the session was cleared
    LoggedOut,
}

/// Tracks token expiry and user activity for one session.
pub struct SessionManager {
    session: Arc<RwLock<Option<Session>>>,
    /// Serializes refresh attempts; overlapping triggers collapse to one.
    refresh_gate: Arc<Mutex<()>>,
    last_activity: Arc<RwLock<DateTime<Utc>>>,
    renewal_window: Duration,
    inactivity_window: Duration,
}

impl SessionManager {
    pub fn new(renewal_window: Duration, inactivity_window: Duration) -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            refresh_gate: Arc::new(Mutex::new(())),
            last_activity: Arc::new(RwLock::new(Utc::now())),
            renewal_window,
            inactivity_window,
        }
    }

    /// Build a manager from the configured renewal and inactivity windows.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            Duration::minutes(config.renewal_window_minutes),
            Duration::minutes(config.inactivity_minutes),
        )
    }

    /// Install a freshly-authenticated session.
    pub async fn establish(&self, session: Session) {
        *self.session.write().await = Some(session);
        *self.last_activity.write().await = Utc::now();
    }

    pub async fn current(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Reset the inactivity countdown. Call on any user-interaction signal
    /// (pointer move, key press, click, touch, scroll).
    pub async fn record_activity(&self) {
        *self.last_activity.write().await = Utc::now();
    }

    /// Clear the session. Idempotent; logging out twice is a no-op.
    pub async fn logout(&self) {
        let mut slot = self.session.write().await;
        if slot.take().is_some() {
            tracing::info!("session cleared");
        }
    }

    /// Force logout if the inactivity window has elapsed, independent of
    /// token validity. Returns true when a logout happened.
    pub async fn check_inactivity(&self) -> bool {
        self.check_inactivity_at(Utc::now()).await
    }

    async fn check_inactivity_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_authenticated().await {
            return false;
        }
        let last = *self.last_activity.read().await;
        if now - last >= self.inactivity_window {
            self.logout().await;
            return true;
        }
        false
    }

    /// Expiry check, run on session establishment and after each refresh.
    ///
    /// An already-expired token is never sent for refresh; the session is
    /// cleared instead. A near-expiry token triggers exactly one refresh
    /// attempt; a failed attempt goes straight to logout, no retry loop.
    pub async fn maybe_refresh(&self, refresher: &dyn TokenRefresher) -> RefreshOutcome {
        // Single in-flight attempt per session.
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            return RefreshOutcome::InFlight;
        };

        let Some(session) = self.current().await else {
            return RefreshOutcome::NoSession;
        };
        let now = Utc::now();
        if now >= session.expires_at {
            self.logout().await;
            return RefreshOutcome::LoggedOut;
        }
        if session.expires_at - now >= self.renewal_window {
            return RefreshOutcome::NotDue;
        }

        let refreshed = match refresher.refresh(&session.token).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, logging out");
                self.logout().await;
                return RefreshOutcome::LoggedOut;
            }
        };
        let expires_at = match decode_expiry_unverified(&refreshed.token) {
            Ok(expiry) => expiry,
            Err(e) => {
                tracing::warn!(error = %e, "refreshed token unreadable, logging out");
                self.logout().await;
                return RefreshOutcome::LoggedOut;
            }
        };

        // Guard against the stale-write race: a refresh that lands after
        // logout must not resurrect the cleared session.
        let mut slot = self.session.write().await;
        let Some(current) = slot.as_mut() else {
            return RefreshOutcome::Discarded;
        };
        current.token = refreshed.token;
        current.expires_at = expires_at;
        current.role = refreshed.role;
        current.firstname = refreshed.firstname;
        current.lastname = refreshed.lastname;
        current.office = refreshed.office;
        RefreshOutcome::Refreshed
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            refresh_gate: Arc::clone(&self.refresh_gate),
            last_activity: Arc::clone(&self.last_activity),
            renewal_window: self.renewal_window,
            inactivity_window: self.inactivity_window,
        }
    }
}
