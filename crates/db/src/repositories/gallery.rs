//! Gallery repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::gallery_images;
use nsk_core::content::GalleryImageDraft;

/// Gallery repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct GalleryRepository {
    db: DatabaseConnection,
}

impl GalleryRepository {
    /// Creates a new gallery repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists gallery images in display order, optionally filtered by section.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        section: Option<&str>,
    ) -> Result<Vec<gallery_images::Model>, DbErr> {
        let mut query = gallery_images::Entity::find()
            .order_by_asc(gallery_images::Column::DisplayOrder)
            .order_by_asc(gallery_images::Column::CreatedAt);

        if let Some(section) = section {
            query = query.filter(gallery_images::Column::Section.eq(section));
        }

        query.all(&self.db).await
    }

    /// Finds a gallery image by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<gallery_images::Model>, DbErr> {
        gallery_images::Entity::find_by_id(id).one(&self.db).await
    }

    /// Inserts or updates a gallery image from a validated draft.
    ///
    /// Gallery records are the one entity where media is mandatory: a save
    /// without a committed image URL is rejected.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` when updating a missing record and
    /// `DbErr::Custom` when no image URL is present.
    pub async fn upsert(
        &self,
        draft: &GalleryImageDraft,
        image_url: Option<String>,
    ) -> Result<gallery_images::Model, DbErr> {
        let Some(image_url) = image_url else {
            return Err(DbErr::Custom(
                "gallery image requires an uploaded image".to_string(),
            ));
        };

        match draft.id {
            None => {
                let model = gallery_images::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    title: Set(draft.title.clone()),
                    description: Set(draft.description.clone()),
                    image_url: Set(image_url),
                    section: Set(draft.section.clone()),
                    display_order: Set(draft.display_order),
                    created_at: Set(Utc::now().into()),
                };
                model.insert(&self.db).await
            }
            Some(id) => {
                let existing = self.find_by_id(id).await?.ok_or_else(|| {
                    DbErr::RecordNotFound(format!("gallery image {id} not found"))
                })?;

                let mut model: gallery_images::ActiveModel = existing.into();
                model.title = Set(draft.title.clone());
                model.description = Set(draft.description.clone());
                model.image_url = Set(image_url);
                model.section = Set(draft.section.clone());
                model.display_order = Set(draft.display_order);
                model.update(&self.db).await
            }
        }
    }

    /// Deletes a gallery image by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = gallery_images::Entity::delete_many()
            .filter(gallery_images::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
