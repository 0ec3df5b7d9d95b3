//! `quartermaster-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod actor;
pub mod error;
pub mod id;
pub mod value_object;

pub use actor::ActorReference;
pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use value_object::ValueObject;
