//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
