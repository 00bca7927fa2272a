//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the use-case oriented data access contract for projects/todos.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Mutations are atomic against the durable store; the in-process cache
//!   reflects the same state before the call returns.
//! - "Not found" is an absent `Option` or `false`, never an error.

pub mod memory_repo;
pub mod sqlite_repo;
pub mod todo_repo;
