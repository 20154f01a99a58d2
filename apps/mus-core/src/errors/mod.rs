//! Error handling for the Mus engine.

pub mod domain;

pub use domain::{DomainError, ValidationKind};
