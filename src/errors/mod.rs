//! Error handling for the Tichu rule engine.

pub mod domain;

pub use domain::{DomainError, RejectKind};
