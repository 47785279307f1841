//! In-memory store implementation

use super::{
    NewTraining, NewUser, TaxonomyEntry, TaxonomyStore, TrainingPage, TrainingQuery,
    TrainingRecord, TrainingStore, TrainingUpdate, UserRecord, UserStore, UserUpdate,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local document store backed by locked maps.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    trainings: RwLock<HashMap<Uuid, TrainingRecord>>,
    offices: RwLock<Vec<TaxonomyEntry>>,
    titles: RwLock<Vec<TaxonomyEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        let taken = users.values().any(|u| {
            u.username.eq_ignore_ascii_case(&new.username)
                || u.email.eq_ignore_ascii_case(&new.email)
        });
        if taken {
            return Err(Error::AccountConflict);
        }
        let record = UserRecord::from_new(new);
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| {
                u.username.eq_ignore_ascii_case(identifier)
                    || u.email.eq_ignore_ascii_case(identifier)
            })
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let users = self.users.read().await;
        let mut all: Vec<_> = users.values().cloned().collect();
        all.sort_by(|a, b| a.lastname.cmp(&b.lastname).then(a.firstname.cmp(&b.firstname)));
        Ok(all)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<UserRecord>> {
        let mut users = self.users.write().await;

        // Uniqueness still holds under rename.
        if let Some(username) = &update.username {
            if users
                .values()
                .any(|u| u.id != id && u.username.eq_ignore_ascii_case(username))
            {
                return Err(Error::AccountConflict);
            }
        }
        if let Some(email) = &update.email {
            if users
                .values()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
            {
                return Err(Error::AccountConflict);
            }
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            user.title = title;
        }
        if let Some(firstname) = update.firstname {
            user.firstname = firstname;
        }
        if let Some(lastname) = update.lastname {
            user.lastname = lastname;
        }
        if update.middlename.is_some() {
            user.middlename = update.middlename;
        }
        if let Some(office) = update.office {
            user.office = office;
        }
        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        Ok(Some(user.clone()))
    }

    async fn approve_user(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.approved = true;
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn set_password_hash(&self, id: Uuid, hash: String) -> Result<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&id)
            .map(|user| {
                user.password_hash = hash;
            })
            .is_some())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<(String, DateTime<Utc>)>,
    ) -> Result<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&id)
            .map(|user| match token {
                Some((token, expires)) => {
                    user.reset_token = Some(token);
                    user.reset_expires = Some(expires);
                }
                None => {
                    user.reset_token = None;
                    user.reset_expires = None;
                }
            })
            .is_some())
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.users.read().await.len())
    }
}

#[async_trait]
impl TrainingStore for MemoryStore {
    async fn create_training(&self, new: NewTraining) -> Result<TrainingRecord> {
        let record = TrainingRecord {
            id: Uuid::new_v4(),
            title: new.title,
            training_type: new.training_type,
            start_date: new.start_date,
            end_date: new.end_date,
            hours: new.hours,
            sponsor: new.sponsor,
            author: new.author,
            office: new.office,
            created_at: Utc::now(),
        };
        self.trainings
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_training(&self, id: Uuid) -> Result<Option<TrainingRecord>> {
        Ok(self.trainings.read().await.get(&id).cloned())
    }

    async fn list_trainings(&self, query: &TrainingQuery) -> Result<TrainingPage> {
        let trainings = self.trainings.read().await;

        // The author restriction is part of the query, not a post-filter;
        // totals below describe the restricted view.
        let mut matched: Vec<_> = trainings
            .values()
            .filter(|t| match &query.author {
                Some(author) => t.author.eq_ignore_ascii_case(author),
                None => true,
            })
            .filter(|t| match &query.search {
                Some(search) => t.title.to_lowercase().contains(&search.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));

        let total = matched.len();
        let per_page = query.per_page.max(1);
        let page = query.page.max(1);
        let total_pages = total.div_ceil(per_page);
        let records = matched
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(TrainingPage {
            records,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    async fn update_training(
        &self,
        id: Uuid,
        update: TrainingUpdate,
    ) -> Result<Option<TrainingRecord>> {
        let mut trainings = self.trainings.write().await;
        let Some(training) = trainings.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            training.title = title;
        }
        if let Some(training_type) = update.training_type {
            training.training_type = training_type;
        }
        if let Some(start_date) = update.start_date {
            training.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            training.end_date = end_date;
        }
        if let Some(hours) = update.hours {
            training.hours = hours;
        }
        if let Some(sponsor) = update.sponsor {
            training.sponsor = sponsor;
        }
        if let Some(office) = update.office {
            training.office = office;
        }
        Ok(Some(training.clone()))
    }

    async fn delete_training(&self, id: Uuid) -> Result<bool> {
        Ok(self.trainings.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl TaxonomyStore for MemoryStore {
    async fn list_offices(&self) -> Result<Vec<TaxonomyEntry>> {
        let mut offices = self.offices.read().await.clone();
        offices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(offices)
    }

    async fn add_office(&self, name: &str) -> Result<TaxonomyEntry> {
        let mut offices = self.offices.write().await;
        if offices.iter().any(|o| o.name.eq_ignore_ascii_case(name)) {
            return Err(Error::Validation(format!(
                "Office '{}' already exists",
                name
            )));
        }
        let entry = TaxonomyEntry::new(name);
        offices.push(entry.clone());
        Ok(entry)
    }

    async fn delete_office(&self, id: Uuid) -> Result<bool> {
        let mut offices = self.offices.write().await;
        let before = offices.len();
        offices.retain(|o| o.id != id);
        Ok(offices.len() < before)
    }

    async fn list_training_titles(&self) -> Result<Vec<TaxonomyEntry>> {
        let mut titles = self.titles.read().await.clone();
        titles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(titles)
    }

    async fn add_training_title(&self, name: &str) -> Result<TaxonomyEntry> {
        let mut titles = self.titles.write().await;
        if titles.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(Error::Validation(format!(
                "Training title '{}' already exists",
                name
            )));
        }
        let entry = TaxonomyEntry::new(name);
        titles.push(entry.clone());
        Ok(entry)
    }

    async fn delete_training_title(&self, id: Uuid) -> Result<bool> {
        let mut titles = self.titles.write().await;
        let before = titles.len();
        titles.retain(|t| t.id != id);
        Ok(titles.len() < before)
    }
}
