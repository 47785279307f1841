//! HTTP API server

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{authenticate, require_admin};
use crate::auth::{Role, TokenIssuer};
use crate::config::Config;
use crate::error::Result;
use crate::mail::{LogMailer, Mailer};
use crate::store::{MemoryStore, NewUser, TaxonomyStore, TrainingStore, UserStore};

use super::{auth as auth_routes, taxonomy, trainings, users};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub issuer: TokenIssuer,
    pub users: Arc<dyn UserStore>,
    pub trainings: Arc<dyn TrainingStore>,
    pub taxonomy: Arc<dyn TaxonomyStore>,
    pub mailer: Arc<dyn Mailer>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config) -> SharedState {
        let store = Arc::new(MemoryStore::new());
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<MemoryStore>) -> SharedState {
        let issuer = TokenIssuer::new(&config.auth.secret, config.auth.token_ttl_minutes);
        Arc::new(AppState {
            config,
            issuer,
            users: store.clone(),
            trainings: store.clone(),
            taxonomy: store,
            mailer: Arc::new(LogMailer),
        })
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = AppState::new(config);
    bootstrap(&state).await?;

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the configured initial account when the store is empty.
pub async fn bootstrap(state: &SharedState) -> Result<()> {
    let Some(seed) = &state.config.bootstrap else {
        return Ok(());
    };
    if state.users.count_users().await? > 0 {
        return Ok(());
    }

    let hash = bcrypt::hash(&seed.password, bcrypt::DEFAULT_COST)?;
    let user = state
        .users
        .create_user(NewUser {
            title: String::new(),
            firstname: seed.firstname.clone(),
            lastname: seed.lastname.clone(),
            middlename: None,
            office: seed.office.clone(),
            username: seed.username.clone(),
            email: seed.email.clone(),
            role: Role::SuperAdmin,
            password_hash: hash,
            approved: true,
        })
        .await?;
    tracing::info!(username = %user.username, "bootstrapped initial account");
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    // Routes requiring an administrative role, gated after authentication.
    let admin_routes = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/users/{id}", delete(users::delete_user))
        .route("/api/users/{id}/approve", put(users::approve_user))
        .route("/api/offices", post(taxonomy::create_office))
        .route("/api/offices/{id}", delete(taxonomy::delete_office))
        .route("/api/training-titles", post(taxonomy::create_training_title))
        .route(
            "/api/training-titles/{id}",
            delete(taxonomy::delete_training_title),
        )
        .route_layer(from_fn(require_admin));

    // Routes requiring a valid token; role and ownership rules apply per
    // handler.
    let protected = Router::new()
        .route(
            "/api/users/{id}",
            get(users::get_user).put(users::update_user),
        )
        .route(
            "/api/trainings",
            get(trainings::list_trainings).post(trainings::create_training),
        )
        .route(
            "/api/trainings/{id}",
            get(trainings::get_training)
                .put(trainings::update_training)
                .delete(trainings::delete_training),
        )
        .merge(admin_routes)
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    // Public routes: authentication entry points and read-only taxonomies.
    Router::new()
        .route("/api/health", get(health))
        .route("/api/login", post(auth_routes::login))
        .route("/api/register", post(auth_routes::register))
        .route("/api/refresh-token", post(auth_routes::refresh_token))
        .route("/api/forgot-password", post(auth_routes::forgot_password))
        .route("/api/reset-password/{token}", put(auth_routes::reset_password))
        .route("/api/offices", get(taxonomy::list_offices))
        .route("/api/training-titles", get(taxonomy::list_training_titles))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
