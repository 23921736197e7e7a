//! Domain models for the gym billing and point-of-sale system

pub mod branch;
pub mod expense;
pub mod invoice;
pub mod plan;
pub mod product;
pub mod sale;
pub mod staff;

pub use branch::*;
pub use expense::*;
pub use invoice::*;
pub use plan::*;
pub use product::*;
pub use sale::*;
pub use staff::*;
