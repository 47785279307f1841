//! Training-record route handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::models::AuthUser;
use crate::auth::policy;
use crate::error::{Error, Result};
use crate::store::{
    NewTraining, TrainingPage, TrainingQuery, TrainingRecord, TrainingType, TrainingUpdate,
};

use super::server::SharedState;
use super::MessageResponse;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct CreateTrainingRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub training_type: TrainingType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: f64,
    pub sponsor: String,
    #[serde(default)]
    pub office: Option<String>,
    /// Ignored for Members; their records are always authored as
    /// themselves.
    #[serde(default)]
    pub author: Option<String>,
}

/// GET /api/trainings
///
/// Members see only their own records; the restriction is part of the
/// store query, so totals and page counts describe the restricted view.
pub async fn list_trainings(
    State(state): State<SharedState>,
    caller: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<TrainingPage>> {
    let query = TrainingQuery {
        author: policy::training_author_filter(&caller),
        search: params.search,
        page: params.page,
        per_page: params.per_page,
    };
    Ok(Json(state.trainings.list_trainings(&query).await?))
}

/// POST /api/trainings
pub async fn create_training(
    State(state): State<SharedState>,
    caller: AuthUser,
    Json(req): Json<CreateTrainingRequest>,
) -> Result<(StatusCode, Json<TrainingRecord>)> {
    if req.title.trim().is_empty() || req.sponsor.trim().is_empty() {
        return Err(Error::Validation(
            "Title and sponsor are required.".to_string(),
        ));
    }
    if req.end_date < req.start_date {
        return Err(Error::Validation(
            "End date must not precede start date.".to_string(),
        ));
    }
    // NaN fails every ordered comparison, so check finiteness explicitly.
    if !req.hours.is_finite() || req.hours < 0.0 {
        return Err(Error::Validation(
            "Hours must be a non-negative number.".to_string(),
        ));
    }

    let author = match req.author {
        Some(author) if caller.role.is_admin() => author,
        _ => caller.display_name(),
    };
    let record = state
        .trainings
        .create_training(NewTraining {
            title: req.title,
            training_type: req.training_type,
            start_date: req.start_date,
            end_date: req.end_date,
            hours: req.hours,
            sponsor: req.sponsor,
            author,
            office: req.office.unwrap_or_else(|| caller.office.clone()),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/trainings/{id}
pub async fn get_training(
    State(state): State<SharedState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingRecord>> {
    let record = state
        .trainings
        .get_training(id)
        .await?
        .ok_or(Error::NotFound("Training"))?;
    if !policy::can_access_training(&caller, &record.author) {
        return Err(Error::Forbidden);
    }
    Ok(Json(record))
}

/// PUT /api/trainings/{id}
pub async fn update_training(
    State(state): State<SharedState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<TrainingUpdate>,
) -> Result<Json<TrainingRecord>> {
    let record = state
        .trainings
        .get_training(id)
        .await?
        .ok_or(Error::NotFound("Training"))?;
    if !policy::can_access_training(&caller, &record.author) {
        return Err(Error::Forbidden);
    }
    let updated = state
        .trainings
        .update_training(id, update)
        .await?
        .ok_or(Error::NotFound("Training"))?;
    Ok(Json(updated))
}

/// DELETE /api/trainings/{id}
pub async fn delete_training(
    State(state): State<SharedState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let record = state
        .trainings
        .get_training(id)
        .await?
        .ok_or(Error::NotFound("Training"))?;
    if !policy::can_access_training(&caller, &record.author) {
        return Err(Error::Forbidden);
    }
    state.trainings.delete_training(id).await?;
    Ok(Json(MessageResponse::new("Training deleted successfully")))
}
