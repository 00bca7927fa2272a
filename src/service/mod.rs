//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Validate user input before any persistence call.
//! - Keep the presentation layer decoupled from storage details.

pub mod project_service;
pub mod todo_service;
