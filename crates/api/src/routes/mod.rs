//! HTTP route handlers.

pub mod health;
pub mod messages;
pub mod push;
pub mod statistics;
