use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retaildesk_core::{DomainError, DomainResult};
use retaildesk_events::Event;
use retaildesk_inventory::{AdjustStock, ItemId, StockPolicy};
use retaildesk_parties::SupplierId;

/// Command: ReceivePurchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivePurchase {
    pub item_id: ItemId,
    pub item: String,
    pub supplier_id: SupplierId,
    pub supplier: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchaseReceived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceived {
    pub item_id: ItemId,
    pub item: String,
    pub supplier_id: SupplierId,
    pub supplier: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

impl PurchaseReceived {
    /// The inventory adjustment that books this purchase.
    pub fn stock_adjustment(&self) -> AdjustStock {
        AdjustStock {
            item_id: self.item_id,
            delta: self.quantity,
            // Restocking only ever raises the balance.
            policy: StockPolicy::AllowNegative,
            occurred_at: self.occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseEvent {
    PurchaseReceived(PurchaseReceived),
}

impl Event for PurchaseEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PurchaseEvent::PurchaseReceived(_) => "purchasing.purchase.received",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PurchaseEvent::PurchaseReceived(e) => e.occurred_at,
        }
    }

    fn describe(&self) -> String {
        match self {
            PurchaseEvent::PurchaseReceived(e) => format!(
                "Purchase recorded: {} - {} units from {}",
                e.item, e.quantity, e.supplier
            ),
        }
    }
}

/// Decide a purchase receipt. Stateless: nothing is stored.
pub fn receive(cmd: &ReceivePurchase) -> DomainResult<PurchaseEvent> {
    if cmd.quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }

    Ok(PurchaseEvent::PurchaseReceived(PurchaseReceived {
        item_id: cmd.item_id,
        item: cmd.item.clone(),
        supplier_id: cmd.supplier_id,
        supplier: cmd.supplier.clone(),
        quantity: cmd.quantity,
        occurred_at: cmd.occurred_at,
    }))
}
