//! Program repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::programs;
use nsk_core::content::ProgramDraft;

/// Program repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProgramRepository {
    db: DatabaseConnection,
}

impl ProgramRepository {
    /// Creates a new program repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists programs, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<programs::Model>, DbErr> {
        programs::Entity::find()
            .order_by_asc(programs::Column::Price)
            .all(&self.db)
            .await
    }

    /// Finds a program by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<programs::Model>, DbErr> {
        programs::Entity::find_by_id(id).one(&self.db).await
    }

    /// Inserts or updates a program from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` when updating a missing record.
    pub async fn upsert(
        &self,
        draft: &ProgramDraft,
        image_url: Option<String>,
    ) -> Result<programs::Model, DbErr> {
        let now = Utc::now();

        match draft.id {
            None => {
                let model = programs::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(draft.name.clone()),
                    description: Set(draft.description.clone()),
                    price: Set(draft.price),
                    features: Set(serde_json::json!(draft.features)),
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
                    .ok_or_else(|| DbErr::RecordNotFound(format!("program {id} not found")))?;

                let mut model: programs::ActiveModel = existing.into();
                model.name = Set(draft.name.clone());
                model.description = Set(draft.description.clone());
                model.price = Set(draft.price);
                model.features = Set(serde_json::json!(draft.features));
                model.image_url = Set(image_url);
                model.updated_at = Set(now.into());
                model.update(&self.db).await
            }
        }
    }

    /// Deletes a program by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = programs::Entity::delete_many()
            .filter(programs::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
