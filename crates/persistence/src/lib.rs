//! Persistence layer for the push platform.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain store traits
//! - Query duration metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
