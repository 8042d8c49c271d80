//! Initial database migration.
//!
//! Creates the content tables, submission tables, and the admin user table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CONTENT TABLES
        // ============================================================
        db.execute_unprepared(EVENTS_SQL).await?;
        db.execute_unprepared(TESTIMONIALS_SQL).await?;
        db.execute_unprepared(PROGRAMS_SQL).await?;
        db.execute_unprepared(GALLERY_IMAGES_SQL).await?;

        // ============================================================
        // PART 2: VISITOR SUBMISSIONS
        // ============================================================
        db.execute_unprepared(ADMISSION_FORMS_SQL).await?;
        db.execute_unprepared(CONTACT_MESSAGES_SQL).await?;

        // ============================================================
        // PART 3: ADMIN USERS
        // ============================================================
        db.execute_unprepared(ADMIN_USERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const EVENTS_SQL: &str = r"
CREATE TABLE events (
    id UUID PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    excerpt TEXT NOT NULL,
    content TEXT NOT NULL,
    date DATE NOT NULL,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb,
    image_url VARCHAR(2048),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_events_date ON events (date DESC);
";

const TESTIMONIALS_SQL: &str = r"
CREATE TABLE testimonials (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    content TEXT NOT NULL,
    belt_level VARCHAR(100) NOT NULL,
    rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
    image_url VARCHAR(2048),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_testimonials_created_at ON testimonials (created_at DESC);
";

const PROGRAMS_SQL: &str = r"
CREATE TABLE programs (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
    features JSONB NOT NULL DEFAULT '[]'::jsonb,
    image_url VARCHAR(2048),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_programs_price ON programs (price ASC);
";

const GALLERY_IMAGES_SQL: &str = r"
CREATE TABLE gallery_images (
    id UUID PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    description TEXT,
    image_url VARCHAR(2048) NOT NULL,
    section VARCHAR(100) NOT NULL,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_gallery_images_order ON gallery_images (display_order ASC);
CREATE INDEX idx_gallery_images_section ON gallery_images (section);
";

const ADMISSION_FORMS_SQL: &str = r"
CREATE TABLE admission_forms (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(320) NOT NULL,
    phone VARCHAR(50) NOT NULL,
    city VARCHAR(100) NOT NULL,
    selected_class VARCHAR(100) NOT NULL,
    message TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_admission_forms_created_at ON admission_forms (created_at DESC);
";

const CONTACT_MESSAGES_SQL: &str = r"
CREATE TABLE contact_messages (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(320) NOT NULL,
    phone VARCHAR(50),
    subject VARCHAR(255),
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_contact_messages_created_at ON contact_messages (created_at DESC);
";

const ADMIN_USERS_SQL: &str = r"
CREATE TABLE admin_users (
    id UUID PRIMARY KEY,
    email VARCHAR(320) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS admin_users;
DROP TABLE IF EXISTS contact_messages;
DROP TABLE IF EXISTS admission_forms;
DROP TABLE IF EXISTS gallery_images;
DROP TABLE IF EXISTS programs;
DROP TABLE IF EXISTS testimonials;
DROP TABLE IF EXISTS events;
";
