//! Database models for the gym billing backend
//!
//! Re-exports models from the shared crate; row-mapping structs live
//! next to the services that query them.

pub use shared::models::*;
