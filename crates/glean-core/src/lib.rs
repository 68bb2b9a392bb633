//! # glean-core
//!
//! Core types, task identifiers, and error types for glean.
//!
//! This crate provides the foundational types shared across all glean crates:
//! - Entity structs for articles and their analysis records
//! - The analysis status enum with its state machine transitions
//! - Task identifier formatting and parsing
//! - Article ingestion rules (title/author extraction, size and type limits)
//! - Cross-cutting error types
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod ingest;
pub mod responses;
