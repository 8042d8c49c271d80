//! Testimonial repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::testimonials;
use nsk_core::content::TestimonialDraft;

/// Testimonial repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TestimonialRepository {
    db: DatabaseConnection,
}

impl TestimonialRepository {
    /// Creates a new testimonial repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists testimonials, newest first. `limit` caps the result (the home
    /// page shows only the first few).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, limit: Option<u64>) -> Result<Vec<testimonials::Model>, DbErr> {
        testimonials::Entity::find()
            .order_by_desc(testimonials::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Finds a testimonial by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<testimonials::Model>, DbErr> {
        testimonials::Entity::find_by_id(id).one(&self.db).await
    }

    /// Inserts or updates a testimonial from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` when updating a missing record.
    pub async fn upsert(
        &self,
        draft: &TestimonialDraft,
        image_url: Option<String>,
    ) -> Result<testimonials::Model, DbErr> {
        match draft.id {
            None => {
                let model = testimonials::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(draft.name.clone()),
                    content: Set(draft.content.clone()),
                    belt_level: Set(draft.belt_level.clone()),
                    rating: Set(draft.rating),
                    image_url: Set(image_url),
                    created_at: Set(Utc::now().into()),
                };
                model.insert(&self.db).await
            }
            Some(id) => {
                let existing = self.find_by_id(id).await?.ok_or_else(|| {
                    DbErr::RecordNotFound(format!("testimonial {id} not found"))
                })?;

                let mut model: testimonials::ActiveModel = existing.into();
                model.name = Set(draft.name.clone());
                model.content = Set(draft.content.clone());
                model.belt_level = Set(draft.belt_level.clone());
                model.rating = Set(draft.rating);
                model.image_url = Set(image_url);
                model.update(&self.db).await
            }
        }
    }

    /// Deletes a testimonial by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = testimonials::Entity::delete_many()
            .filter(testimonials::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
