//! Clone module for Valley.
//!
//! Clones are the actor identities through which users participate:
//! they author posts and replies and hold board subscriptions. This crate
//! only needs them by reference, so the module is a thin model + lookups.

mod repository;
mod types;

pub use repository::CloneRepository;
pub use types::{Clone, NewClone};
