//! # Quill Core
//!
//! The domain layer of the Quill blog API.
//! This crate contains the post model, its schema rules and the store ports,
//! with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
