//! Object storage for uploaded media.
//!
//! A thin vendor-agnostic wrapper around Apache OpenDAL. Uploaded objects
//! are addressed by `{folder}/{timestamp}.{ext}` keys and served from a
//! configured public base URL.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{StorageService, StoredObject};
