//! Inventory domain module.
//!
//! Stock levels and prices per item, implemented purely as deterministic
//! domain logic (no IO, no rendering, no storage).

pub mod directory;
pub mod item;

pub use directory::{
    AdjustStock, CreateItem, Inventory, InventoryCommand, InventoryEvent, InventoryId,
    ItemCreated, StockAdjusted,
};
pub use item::{InventoryItem, ItemId, StockPolicy, DEFAULT_LOW_STOCK_THRESHOLD};
