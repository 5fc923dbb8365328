use serde::{Deserialize, Serialize};

use retaildesk_core::{AggregateId, DomainError, DomainResult, Entity, Money};

/// Items with stock strictly below this are reported as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 20;

/// Inventory item identifier. Generated per row, so duplicate names stay addressable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub AggregateId);

impl ItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What a stock adjustment may do to the running balance.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Oversell is permitted; stock may go below zero.
    #[default]
    AllowNegative,
    /// An adjustment leaving stock below zero is rejected.
    RejectNegative,
}

/// One inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    stock: i64,
    price: Money,
}

impl InventoryItem {
    pub(crate) fn new(id: ItemId, name: String, stock: i64, price: Money) -> Self {
        Self {
            id,
            name,
            stock,
            price,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }

    /// Stock after applying `delta`, checked against `policy`.
    pub fn stock_after(&self, delta: i64, policy: StockPolicy) -> DomainResult<i64> {
        let new_stock = self
            .stock
            .checked_add(delta)
            .ok_or_else(|| DomainError::invariant("stock overflow"))?;
        if new_stock < 0 && policy == StockPolicy::RejectNegative {
            return Err(DomainError::invariant(format!(
                "stock of {} cannot go negative (have {}, change {})",
                self.name, self.stock, delta
            )));
        }
        Ok(new_stock)
    }

    pub(crate) fn set_stock(&mut self, stock: i64) {
        self.stock = stock;
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(stock: i64) -> InventoryItem {
        InventoryItem::new(ItemId::generate(), "Oil".into(), stock, Money::from_units(120))
    }

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        assert!(item(19).is_low_stock(DEFAULT_LOW_STOCK_THRESHOLD));
        assert!(!item(20).is_low_stock(DEFAULT_LOW_STOCK_THRESHOLD));
    }

    #[test]
    fn allow_negative_lets_stock_drop_below_zero() {
        assert_eq!(item(3).stock_after(-5, StockPolicy::AllowNegative).unwrap(), -2);
    }

    #[test]
    fn reject_negative_refuses_oversell() {
        let err = item(3).stock_after(-5, StockPolicy::RejectNegative).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("cannot go negative") => {}
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
        assert_eq!(item(5).stock_after(-5, StockPolicy::RejectNegative).unwrap(), 0);
    }
}
