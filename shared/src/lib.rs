//! Shared types and models for the gym billing and point-of-sale system
//!
//! This crate contains the pure billing core (GST totals, invoice
//! numbering) plus the domain models and validation helpers shared
//! between the backend and its clients.

pub mod billing;
pub mod models;
pub mod periods;
pub mod shop;
pub mod types;
pub mod validation;

pub use billing::*;
pub use models::*;
pub use periods::*;
pub use shop::*;
pub use types::*;
pub use validation::*;
