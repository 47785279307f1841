//! Office and training-title taxonomy handlers
//!
//! Listing is public (registration forms need both before any login);
//! mutation is administrative.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::TaxonomyEntry;

use super::server::SharedState;
use super::MessageResponse;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub name: String,
}

pub async fn list_offices(State(state): State<SharedState>) -> Result<Json<Vec<TaxonomyEntry>>> {
    Ok(Json(state.taxonomy.list_offices().await?))
}

pub async fn create_office(
    State(state): State<SharedState>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<TaxonomyEntry>)> {
    if req.name.trim().is_empty() {
        return Err(Error::Validation("Name is required.".to_string()));
    }
    let entry = state.taxonomy.add_office(req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_office(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    if !state.taxonomy.delete_office(id).await? {
        return Err(Error::NotFound("Office"));
    }
    Ok(Json(MessageResponse::new("Office deleted successfully")))
}

pub async fn list_training_titles(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TaxonomyEntry>>> {
    Ok(Json(state.taxonomy.list_training_titles().await?))
}

pub async fn create_training_title(
    State(state): State<SharedState>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<TaxonomyEntry>)> {
    if req.name.trim().is_empty() {
        return Err(Error::Validation("Name is required.".to_string()));
    }
    let entry = state.taxonomy.add_training_title(req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_training_title(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    if !state.taxonomy.delete_training_title(id).await? {
        return Err(Error::NotFound("Training title"));
    }
    Ok(Json(MessageResponse::new(
        "Training title deleted successfully",
    )))
}
