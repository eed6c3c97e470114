//! HTTP request handlers.

pub mod auth;
pub mod contact;
pub mod health;
pub mod pets;
pub mod uploads;
