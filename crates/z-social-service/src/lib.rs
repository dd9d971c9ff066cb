//! Z-Social HTTP API Service.
//!
//! This crate provides the HTTP API for the z-social service, including:
//!
//! - Registration and login
//! - Profile viewing and editing, including picture upload
//! - Follow / unfollow and follower listings
//! - Username and display-name search
//!
//! The request-independent logic lives in [`social`]; handlers only translate
//! between HTTP and those functions.
//!
//! # Authentication
//!
//! Login returns an HS256 JWT. Authenticated endpoints expect it as
//! `Authorization: Bearer <token>`; the resolved account id is passed
//! explicitly into every [`social`] call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for Axum even when the store is sync

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod pictures;
pub mod routes;
pub mod social;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use pictures::PictureStorage;
pub use routes::create_router;
pub use state::AppState;
