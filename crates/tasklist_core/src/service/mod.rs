//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the task store contract.
//! - Keep presenters and hosts decoupled from storage details.

pub mod task_store;
