//! Core types shared by the reader and writer

mod error;
mod secret;

pub use error::{CredentialError, Result};
pub use secret::SecretString;
