//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage, seed, validation and view calls into one store API.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod inventory;
