//! Business logic services for the gym billing backend

pub mod auth;
pub mod expense;
pub mod invoice;
pub mod plan;
pub mod product;
pub mod reporting;
pub mod sale;
pub mod staff;

pub use auth::AuthService;
pub use expense::ExpenseService;
pub use invoice::InvoiceService;
pub use plan::PlanService;
pub use product::ProductService;
pub use reporting::ReportingService;
pub use sale::SaleService;
pub use staff::StaffService;
