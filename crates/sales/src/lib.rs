//! Sales ledger domain module.
//!
//! An append-only ledger of sale records, implemented purely as deterministic
//! domain logic (no IO, no rendering, no storage).

pub mod ledger;

pub use ledger::{
    RecordSale, SaleId, SaleRecord, SaleRecorded, SalesCommand, SalesEvent, SalesLedger,
    SalesLedgerId,
};
