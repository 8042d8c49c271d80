//! Shared types, errors, and configuration for the NSK backend.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT handling for the admin panel

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{AccessToken, Claims, LoginRequest};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
