//! Session layer: owned table state, seed data, configuration, command
//! dispatch and derived reports.

pub mod command_dispatcher;
pub mod config;
pub mod projections;
pub mod seed;
pub mod session;


pub use command_dispatcher::{
    DispatchError, ItemRef, Outcome, SessionCommand, SessionEvent, SupplierRef,
};
pub use config::{ConfigError, SeedVariant, SessionConfig};
pub use projections::monthly_sales::{MonthRow, MonthlyReport, MonthlySalesProjection};
pub use session::Session;
