//! Data models shared across handlers and stores

pub mod media;
pub mod user;
