//! Admin user repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::admin_users;

/// Admin user repository.
#[derive(Debug, Clone)]
pub struct AdminUserRepository {
    db: DatabaseConnection,
}

impl AdminUserRepository {
    /// Creates a new admin user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an active admin user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<admin_users::Model>, DbErr> {
        admin_users::Entity::find()
            .filter(admin_users::Column::Email.eq(email))
            .filter(admin_users::Column::IsActive.eq(true))
            .one(&self.db)
            .await
    }

    /// Creates an admin user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including duplicate
    /// email).
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<admin_users::Model, DbErr> {
        let now = Utc::now();
        let model = admin_users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(full_name.to_string()),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        model.insert(&self.db).await
    }
}
