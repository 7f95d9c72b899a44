//! Shared utilities and common types for the push platform backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Offset pagination primitives
//! - Day labels and date-range parsing
//! - Common validation logic

pub mod pagination;
pub mod time;
pub mod validation;
