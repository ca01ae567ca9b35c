//! # Folio Core
//!
//! The domain layer of the Folio blog backend.
//! Posts, admin profiles, the trend scorer and the feed query live here,
//! together with the ports the infrastructure crate implements. No I/O.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
