//! Repository implementations for persisted configuration.
//!
//! The only persisted record is the recipient address. The repository owns
//! the file format; the service layer validates addresses before storing them.

mod error;
mod recipient;

pub use error::RepositoryError;
pub use recipient::{RecipientRepository, RecipientRepositoryTrait, RecipientService};
