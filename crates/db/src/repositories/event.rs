//! Event repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::events;
use nsk_core::content::EventDraft;

/// Event repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EventRepository {
    db: DatabaseConnection,
}

impl EventRepository {
    /// Creates a new event repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all events, newest event date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<events::Model>, DbErr> {
        events::Entity::find()
            .order_by_desc(events::Column::Date)
            .order_by_desc(events::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<events::Model>, DbErr> {
        events::Entity::find_by_id(id).one(&self.db).await
    }

    /// Inserts or updates an event from a validated draft.
    ///
    /// `image_url` is the final media reference for the record: `Some` after
    /// a successful commit, `None` when the draft carries no media.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` when updating a missing record.
    pub async fn upsert(
        &self,
        draft: &EventDraft,
        image_url: Option<String>,
    ) -> Result<events::Model, DbErr> {
        let now = Utc::now();

        match draft.id {
            None => {
                let model = events::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    title: Set(draft.title.clone()),
                    excerpt: Set(draft.excerpt.clone()),
                    content: Set(draft.content.clone()),
                    date: Set(draft.date),
                    tags: Set(serde_json::json!(draft.tags)),
                    image_url: Set(image_url),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };
                model.insert(&self.db).await
            }
            Some(id) => {
                let existing = self
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("event {id} not found")))?;

                let mut model: events::ActiveModel = existing.into();
                model.title = Set(draft.title.clone());
                model.excerpt = Set(draft.excerpt.clone());
                model.content = Set(draft.content.clone());
                model.date = Set(draft.date);
                model.tags = Set(serde_json::json!(draft.tags));
                model.image_url = Set(image_url);
                model.updated_at = Set(now.into());
                model.update(&self.db).await
            }
        }
    }

    /// Deletes an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = events::Entity::delete_many()
            .filter(events::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
