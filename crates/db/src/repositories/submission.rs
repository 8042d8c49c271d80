//! Submission repository for visitor-submitted forms.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entities::{admission_forms, contact_messages};

/// A new admission form submission.
#[derive(Debug, Clone)]
pub struct NewAdmission {
    /// Applicant name.
    pub name: String,
    /// Applicant email.
    pub email: String,
    /// Applicant phone number.
    pub phone: String,
    /// Applicant city.
    pub city: String,
    /// Class the applicant wants to join.
    pub selected_class: String,
    /// Optional free-form message.
    pub message: Option<String>,
}

/// A new contact message submission.
#[derive(Debug, Clone)]
pub struct NewContact {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Message body.
    pub message: String,
}

/// Repository for admission forms and contact messages.
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    db: DatabaseConnection,
}

impl SubmissionRepository {
    /// Creates a new submission repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores an admission form submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_admission(
        &self,
        input: NewAdmission,
    ) -> Result<admission_forms::Model, DbErr> {
        let model = admission_forms::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            city: Set(input.city),
            selected_class: Set(input.selected_class),
            message: Set(input.message),
            created_at: Set(Utc::now().into()),
        };
        model.insert(&self.db).await
    }

    /// Lists admission forms, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_admissions(&self) -> Result<Vec<admission_forms::Model>, DbErr> {
        admission_forms::Entity::find()
            .order_by_desc(admission_forms::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Stores a contact message submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert_contact(
        &self,
        input: NewContact,
    ) -> Result<contact_messages::Model, DbErr> {
        let model = contact_messages::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            subject: Set(input.subject),
            message: Set(input.message),
            created_at: Set(Utc::now().into()),
        };
        model.insert(&self.db).await
    }

    /// Lists contact messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_contacts(&self) -> Result<Vec<contact_messages::Model>, DbErr> {
        contact_messages::Entity::find()
            .order_by_desc(contact_messages::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
