//! Stored record types

use crate::auth::models::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    /// Honorific (Mr., Ms., Engr., ...)
    pub title: String,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub office: String,
    pub username: String,
    pub email: String,
    /// bcrypt hash; never serialized into responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(rename = "isApproved")]
    pub approved: bool,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn from_new(new: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            firstname: new.firstname,
            lastname: new.lastname,
            middlename: new.middlename,
            office: new.office,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            approved: new.approved,
            reset_token: None,
            reset_expires: None,
            created_at: Utc::now(),
        }
    }

    /// Display name used as the author key on training records.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Fields for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub title: String,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub office: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub approved: bool,
}

/// Profile update applied by self-edit or admin-edit. `None` fields are
/// left untouched; the role field is only honored for administrative
/// callers (enforced in the handler, not here).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub title: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub middlename: Option<String>,
    pub office: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Professional-training classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingType {
    Managerial,
    Supervisory,
    Technical,
}

/// A recorded training attendance.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub training_type: TrainingType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: f64,
    pub sponsor: String,
    /// Display name of the member the record belongs to
    pub author: String,
    pub office: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a training record.
#[derive(Debug, Clone)]
pub struct NewTraining {
    pub title: String,
    pub training_type: TrainingType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: f64,
    pub sponsor: String,
    pub author: String,
    pub office: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingUpdate {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub training_type: Option<TrainingType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub hours: Option<f64>,
    pub sponsor: Option<String>,
    pub office: Option<String>,
}

/// List query. `author` restricts the result set before pagination.
#[derive(Debug, Clone, Default)]
pub struct TrainingQuery {
    pub author: Option<String>,
    /// Case-insensitive match against the training title
    pub search: Option<String>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
}

/// One page of training records plus totals for the filtered view.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingPage {
    pub records: Vec<TrainingRecord>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// An office or training-title taxonomy entry.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyEntry {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TaxonomyEntry {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }
}
