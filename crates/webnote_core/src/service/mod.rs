//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the shell's three actions.
//! - Keep shell widgets decoupled from storage details.

pub mod capture_service;
pub mod viewer_service;
