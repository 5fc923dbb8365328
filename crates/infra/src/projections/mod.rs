//! Projection implementations (derived views).
//!
//! Projections consume domain events and build query-optimized read models.
//! They are disposable and can be rebuilt from the records the events produced.

pub mod monthly_sales;
