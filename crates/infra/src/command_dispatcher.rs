//! Command dispatch: one user action in, one [`Outcome`] out.
//!
//! ```text
//! SessionCommand
//!   ↓
//! 1. Resolve names to row ids
//!   ↓
//! 2. Decide every affected aggregate (pure, nothing applied yet)
//!   ↓
//! 3. Apply all decided events, feed projections
//!   ↓
//! Outcome { events, message }
//! ```
//!
//! Deciding everything before applying anything keeps the tables consistent
//! when one step of a multi-table command is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use retaildesk_core::{Aggregate, DomainError, Money};
use retaildesk_events::{execute, Event, Projection};
use retaildesk_inventory::{AdjustStock, CreateItem, InventoryCommand, InventoryEvent, ItemId};
use retaildesk_parties::{AddSupplier, SupplierCommand, SupplierEvent, SupplierId};
use retaildesk_purchasing::{PurchaseEvent, ReceivePurchase};
use retaildesk_sales::{RecordSale, SaleId, SalesCommand, SalesEvent};

use crate::session::Session;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Input failed a presence or positivity check.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A domain invariant rejected the command (e.g. oversell under the strict policy).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A name matched several rows, or an id collided.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DispatchError::Validation(msg),
            DomainError::InvariantViolation(msg) => DispatchError::InvariantViolation(msg),
            DomainError::InvalidId(msg) => DispatchError::Validation(msg),
            DomainError::NotFound(what) => DispatchError::NotFound(what),
            DomainError::Conflict(msg) => DispatchError::Conflict(msg),
        }
    }
}

/// How a command names an inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRef {
    Id(ItemId),
    Name(String),
}

impl From<&str> for ItemRef {
    fn from(value: &str) -> Self {
        ItemRef::Name(value.to_string())
    }
}

impl From<ItemId> for ItemRef {
    fn from(value: ItemId) -> Self {
        ItemRef::Id(value)
    }
}

/// How a command names a supplier row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierRef {
    Id(SupplierId),
    Name(String),
}

impl From<&str> for SupplierRef {
    fn from(value: &str) -> Self {
        SupplierRef::Name(value.to_string())
    }
}

impl From<SupplierId> for SupplierRef {
    fn from(value: SupplierId) -> Self {
        SupplierRef::Id(value)
    }
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    AddInventoryItem {
        name: String,
        stock: i64,
        price: Money,
    },
    /// `date` defaults to the dispatch time.
    RecordSale {
        item: ItemRef,
        quantity: i64,
        date: Option<DateTime<Utc>>,
    },
    RecordPurchase {
        item: ItemRef,
        quantity: i64,
        supplier: SupplierRef,
    },
    AddSupplier {
        name: String,
        contact: String,
    },
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::AddInventoryItem { .. } => "add_inventory_item",
            SessionCommand::RecordSale { .. } => "record_sale",
            SessionCommand::RecordPurchase { .. } => "record_purchase",
            SessionCommand::AddSupplier { .. } => "add_supplier",
        }
    }
}

/// Any event a dispatch can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "table", content = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Inventory(InventoryEvent),
    Sales(SalesEvent),
    Suppliers(SupplierEvent),
    Purchasing(PurchaseEvent),
}

impl Event for SessionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::Inventory(e) => e.event_type(),
            SessionEvent::Sales(e) => e.event_type(),
            SessionEvent::Suppliers(e) => e.event_type(),
            SessionEvent::Purchasing(e) => e.event_type(),
        }
    }

    fn version(&self) -> u32 {
        match self {
            SessionEvent::Inventory(e) => e.version(),
            SessionEvent::Sales(e) => e.version(),
            SessionEvent::Suppliers(e) => e.version(),
            SessionEvent::Purchasing(e) => e.version(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::Inventory(e) => e.occurred_at(),
            SessionEvent::Sales(e) => e.occurred_at(),
            SessionEvent::Suppliers(e) => e.occurred_at(),
            SessionEvent::Purchasing(e) => e.occurred_at(),
        }
    }

    fn describe(&self) -> String {
        match self {
            SessionEvent::Inventory(e) => e.describe(),
            SessionEvent::Sales(e) => e.describe(),
            SessionEvent::Suppliers(e) => e.describe(),
            SessionEvent::Purchasing(e) => e.describe(),
        }
    }
}

/// Result of a dispatched command: what happened and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub events: Vec<SessionEvent>,
    pub message: String,
}

impl Outcome {
    /// The first event is the primary fact; its description is the message.
    fn from_events(events: Vec<SessionEvent>) -> Self {
        let message = events
            .first()
            .map(Event::describe)
            .unwrap_or_else(|| "Nothing changed".to_string());
        Self { events, message }
    }

    fn ignored(message: impl Into<String>) -> Self {
        Self {
            events: Vec::new(),
            message: message.into(),
        }
    }

    /// True when the command was accepted but changed nothing.
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }
}

impl Session {
    /// Run one command against the session.
    ///
    /// A rejected command leaves every table untouched.
    pub fn dispatch(&mut self, command: SessionCommand) -> Result<Outcome, DispatchError> {
        let name = command.name();
        let result = match command {
            SessionCommand::AddInventoryItem { name, stock, price } => {
                self.add_inventory_item(name, stock, price)
            }
            SessionCommand::RecordSale {
                item,
                quantity,
                date,
            } => self.record_sale(item, quantity, date.unwrap_or_else(Utc::now)),
            SessionCommand::RecordPurchase {
                item,
                quantity,
                supplier,
            } => self.record_purchase(item, quantity, supplier),
            SessionCommand::AddSupplier { name, contact } => self.add_supplier(name, contact),
        };

        match &result {
            Ok(outcome) => tracing::info!(
                command = name,
                events = outcome.events.len(),
                "{}",
                outcome.message
            ),
            Err(err) => tracing::warn!(command = name, "command rejected: {err}"),
        }
        result
    }

    fn resolve_item(&self, item: &ItemRef) -> Result<ItemId, DispatchError> {
        match item {
            ItemRef::Id(id) => self
                .inventory
                .get(*id)
                .map(|i| i.id_typed())
                .ok_or_else(|| DispatchError::NotFound(format!("item {id}"))),
            ItemRef::Name(name) => Ok(self.inventory.resolve(name)?),
        }
    }

    fn resolve_supplier(&self, supplier: &SupplierRef) -> Result<SupplierId, DispatchError> {
        match supplier {
            SupplierRef::Id(id) => self
                .suppliers
                .get(*id)
                .map(|s| s.id_typed())
                .ok_or_else(|| DispatchError::NotFound(format!("supplier {id}"))),
            SupplierRef::Name(name) => Ok(self.suppliers.resolve(name)?),
        }
    }

    fn add_inventory_item(
        &mut self,
        name: String,
        stock: i64,
        price: Money,
    ) -> Result<Outcome, DispatchError> {
        let cmd = InventoryCommand::CreateItem(CreateItem {
            item_id: ItemId::generate(),
            name,
            stock,
            price,
            occurred_at: Utc::now(),
        });
        let events = execute(&mut self.inventory, &cmd)?;
        Ok(Outcome::from_events(
            events.into_iter().map(SessionEvent::Inventory).collect(),
        ))
    }

    fn record_sale(
        &mut self,
        item: ItemRef,
        quantity: i64,
        date: DateTime<Utc>,
    ) -> Result<Outcome, DispatchError> {
        if quantity <= 0 {
            return Err(DispatchError::Validation("quantity must be positive".into()));
        }
        let item_id = self.resolve_item(&item)?;
        let row = self
            .inventory
            .get(item_id)
            .ok_or_else(|| DispatchError::NotFound(format!("item {item_id}")))?;

        let sale = SalesCommand::RecordSale(RecordSale {
            sale_id: SaleId::generate(),
            item_id,
            item: row.name().to_string(),
            quantity,
            price: row.price(),
            occurred_at: date,
        });
        let adjust = InventoryCommand::AdjustStock(AdjustStock {
            item_id,
            delta: -quantity,
            policy: self.config.stock_policy,
            occurred_at: date,
        });

        // Decide both before applying either.
        let sale_events = self.sales.handle(&sale)?;
        let stock_events = self.inventory.handle(&adjust)?;
        for event in &sale_events {
            self.monthly.check(event)?;
        }

        for event in &sale_events {
            self.sales.apply(event);
            self.monthly.apply(event);
        }
        for event in &stock_events {
            self.inventory.apply(event);
            if let InventoryEvent::StockAdjusted(e) = event {
                if e.new_stock < 0 {
                    tracing::warn!(
                        item = %e.name,
                        stock = e.new_stock,
                        "oversold: stock is negative"
                    );
                }
            }
        }

        let events = sale_events
            .into_iter()
            .map(SessionEvent::Sales)
            .chain(stock_events.into_iter().map(SessionEvent::Inventory))
            .collect();
        Ok(Outcome::from_events(events))
    }

    fn record_purchase(
        &mut self,
        item: ItemRef,
        quantity: i64,
        supplier: SupplierRef,
    ) -> Result<Outcome, DispatchError> {
        let item_id = self.resolve_item(&item)?;
        let supplier_id = self.resolve_supplier(&supplier)?;
        let item_name = self
            .inventory
            .get(item_id)
            .map(|i| i.name().to_string())
            .ok_or_else(|| DispatchError::NotFound(format!("item {item_id}")))?;
        let supplier_name = self
            .suppliers
            .get(supplier_id)
            .map(|s| s.name().to_string())
            .ok_or_else(|| DispatchError::NotFound(format!("supplier {supplier_id}")))?;

        let receipt = retaildesk_purchasing::receive(&ReceivePurchase {
            item_id,
            item: item_name,
            supplier_id,
            supplier: supplier_name,
            quantity,
            occurred_at: Utc::now(),
        })?;
        let PurchaseEvent::PurchaseReceived(received) = &receipt;
        let adjust = InventoryCommand::AdjustStock(received.stock_adjustment());
        let stock_events = execute(&mut self.inventory, &adjust)?;

        let events = std::iter::once(SessionEvent::Purchasing(receipt))
            .chain(stock_events.into_iter().map(SessionEvent::Inventory))
            .collect();
        Ok(Outcome::from_events(events))
    }

    fn add_supplier(&mut self, name: String, contact: String) -> Result<Outcome, DispatchError> {
        let cmd = SupplierCommand::AddSupplier(AddSupplier {
            supplier_id: SupplierId::generate(),
            name,
            contact,
            occurred_at: Utc::now(),
        });
        let events = execute(&mut self.suppliers, &cmd)?;
        if events.is_empty() {
            return Ok(Outcome::ignored(
                "Supplier not added: name and contact are required",
            ));
        }
        Ok(Outcome::from_events(
            events.into_iter().map(SessionEvent::Suppliers).collect(),
        ))
    }
}
