//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep calling layers decoupled from storage details.
//!
//! # Invariants
//! - Services never retry store failures; each surfaces once.
//! - Every service error exposes `kind()` for outcome mapping.

pub mod profile_service;
pub mod relationship_service;
pub mod search_service;
