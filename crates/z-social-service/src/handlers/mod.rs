//! API handlers.

pub mod accounts;
pub mod follows;
pub mod health;
pub mod profiles;
pub mod search;
