//! Shared kernel: identifiers, error model, request context.

pub mod context;
pub mod error;
pub mod id;

pub use context::{RequestContext, Session};
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, UserId};
