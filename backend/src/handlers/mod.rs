//! HTTP handlers for the gym billing backend

pub mod auth;
pub mod expense;
pub mod health;
pub mod invoice;
pub mod plan;
pub mod product;
pub mod reporting;
pub mod sale;
pub mod staff;

pub use auth::*;
pub use expense::*;
pub use health::*;
pub use invoice::*;
pub use plan::*;
pub use product::*;
pub use reporting::*;
pub use sale::*;
pub use staff::*;
