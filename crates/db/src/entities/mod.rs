//! `SeaORM` entity definitions.

pub mod admin_users;
pub mod admission_forms;
pub mod contact_messages;
pub mod events;
pub mod gallery_images;
pub mod programs;
pub mod testimonials;
