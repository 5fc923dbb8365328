//! Supplier directory domain module.

pub mod supplier;

pub use supplier::{
    AddSupplier, Supplier, SupplierAdded, SupplierCommand, SupplierDirectory,
    SupplierDirectoryId, SupplierEvent, SupplierId,
};
