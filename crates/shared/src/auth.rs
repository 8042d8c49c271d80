//! Authentication types for the admin panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for admin access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin user ID).
    pub sub: Uuid,
    /// User's role (currently always `admin`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an admin user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Admin email.
    pub email: String,
    /// Admin password.
    pub password: String,
}

/// Token issued after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer token for the admin API.
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

impl AccessToken {
    /// Creates a new access token response.
    #[must_use]
    pub fn new(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let user_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(user_id, "admin", expires_at);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(claims.iat <= claims.exp);
    }

    #[test]
    fn test_claims_user_id_accessor() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "admin", Utc::now() + Duration::minutes(5));
        assert_eq!(claims.user_id(), user_id);
    }
}
