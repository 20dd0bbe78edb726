// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique sign-in email.
    pub email: String,

    pub name: String,

    /// User role: 'staff' or 'admin'.
    pub role: String,

    /// Company code the user last signed in with.
    pub company_code: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for checking a company code before sign-in.
#[derive(Debug, Deserialize, Validate)]
pub struct CompanyCodeRequest {
    #[validate(length(min = 1, max = 32, message = "Company code is required."))]
    pub company_code: String,
}

/// DTO for company-code sign-in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 32, message = "Company code is required."))]
    pub company_code: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters."))]
    pub name: String,
}

/// DTO for updating the current user's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = validate_display_name))]
    pub name: String,
}

/// Name must be non-blank and at most 100 characters once trimmed.
fn validate_display_name(name: &str) -> Result<(), validator::ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(validator::ValidationError::new("name_required"));
    }
    if trimmed.chars().count() > 100 {
        return Err(validator::ValidationError::new("name_too_long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_name_validation() {
        let ok = UpdateProfileRequest {
            name: "  Suzuki  ".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = UpdateProfileRequest {
            name: "   ".to_string(),
        };
        assert!(blank.validate().is_err());

        let long = UpdateProfileRequest {
            name: "x".repeat(101),
        };
        assert!(long.validate().is_err());
    }
}
