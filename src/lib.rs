//! Media Vault: a media-management backend.
//!
//! User registration/login plus CRUD over uploaded media objects. Metadata
//! lives in a document store (PostgreSQL in production), binary payloads in a
//! blob store (S3 in production); both are consumed through traits so tests
//! can run against in-memory doubles.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod state;
pub mod store;
pub mod thumbnail;
pub mod validation;

pub use routes::create_router;
