//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract used by the task store.
//! - Keep SQL details out of service and presenter code.

pub mod task_repo;
