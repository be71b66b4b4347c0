//! User-related DTOs for API requests and responses.

use crate::models::{NewUser, UpdateUser, User};
use crate::services::UserDetails;
use jiff::civil::DateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating or replacing a user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UserRequest {
    #[validate(length(min = 2, max = 100, message = "First name must be between 2 and 100 characters"))]
    #[schema(min_length = 2, max_length = 100, example = "Ada")]
    pub first_name: String,
    #[validate(length(min = 2, max = 100, message = "Last name must be between 2 and 100 characters"))]
    #[schema(min_length = 2, max_length = 100, example = "Lovelace")]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[validate(custom(function = "validate_phone", message = "Invalid phone number format"))]
    #[schema(pattern = r"^\+?[1-9]\d{1,14}$", example = "+14155550100")]
    pub phone: String,
    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 100, message = "City must not exceed 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "Country must not exceed 100 characters"))]
    pub country: Option<String>,
}

impl UserRequest {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            country: self.country,
        }
    }

    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            country: self.country,
        }
    }
}

/// Optional filters for the user listing.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct UserFilter {
    /// Only users with this active flag
    pub active: Option<bool>,
}

/// E.164-style phone number: optional `+`, no leading zero, 2 to 15 digits.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    static PHONE: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PHONE.get_or_init(|| Regex::new(r"^\+?[1-9]\d{1,14}$").ok());
    match pattern {
        Some(re) if re.is_match(phone) => Ok(()),
        _ => Err(ValidationError::new("phone")),
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub active: bool,
    /// Number of orders placed by the user; omitted in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<i64>,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub created_at: DateTime,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub updated_at: DateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            city: user.city,
            country: user.country,
            active: user.active,
            total_orders: None,
            created_at: user.created_at.to_jiff(),
            updated_at: user.updated_at.to_jiff(),
        }
    }
}

impl From<UserDetails> for UserResponse {
    fn from(details: UserDetails) -> Self {
        Self {
            total_orders: Some(details.total_orders),
            ..Self::from(details.user)
        }
    }
}
