//! Purchasing domain module.
//!
//! A purchase only restocks inventory. The receipt it produces is a transient
//! confirmation; there is no purchase ledger.

pub mod receipt;

pub use receipt::{receive, PurchaseEvent, PurchaseReceived, ReceivePurchase};
