use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retaildesk_core::{
    find_by_id, Aggregate, AggregateId, AggregateRoot, DomainError, Entity, Money,
};
use retaildesk_events::Event;
use retaildesk_inventory::ItemId;

/// Sale record identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub AggregateId);

impl SaleId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for SaleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of the sales ledger owned by one session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesLedgerId(pub AggregateId);

impl SalesLedgerId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

/// One immutable sale. `revenue` is fixed at creation as `quantity × price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sale_id: SaleId,
    pub date: DateTime<Utc>,
    pub item_id: ItemId,
    pub item: String,
    pub quantity: i64,
    pub price: Money,
    pub revenue: Money,
}

impl SaleRecord {
    /// Calendar month of the sale as `YYYY-MM`.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

impl Entity for SaleRecord {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.sale_id
    }
}

/// Aggregate root: the append-only sales ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesLedger {
    id: SalesLedgerId,
    records: Vec<SaleRecord>,
    version: u64,
}

impl SalesLedger {
    pub fn empty(id: SalesLedgerId) -> Self {
        Self {
            id,
            records: Vec::new(),
            version: 0,
        }
    }

    /// Records in the order they were appended.
    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AggregateRoot for SalesLedger {
    type Id = SalesLedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RecordSale.
///
/// `price` is the item's current price, read from the inventory by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSale {
    pub sale_id: SaleId,
    pub item_id: ItemId,
    pub item: String,
    pub quantity: i64,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesCommand {
    RecordSale(RecordSale),
}

/// Event: SaleRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecorded {
    pub record: SaleRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesEvent {
    SaleRecorded(SaleRecorded),
}

impl Event for SalesEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SalesEvent::SaleRecorded(_) => "sales.sale.recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SalesEvent::SaleRecorded(e) => e.record.date,
        }
    }

    fn describe(&self) -> String {
        match self {
            SalesEvent::SaleRecorded(e) => format!(
                "Sale recorded: {} - {} units",
                e.record.item, e.record.quantity
            ),
        }
    }
}

impl Aggregate for SalesLedger {
    type Command = SalesCommand;
    type Event = SalesEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SalesEvent::SaleRecorded(e) => self.records.push(e.record.clone()),
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SalesCommand::RecordSale(cmd) => self.handle_record(cmd),
        }
    }
}

impl SalesLedger {
    fn handle_record(&self, cmd: &RecordSale) -> Result<Vec<SalesEvent>, DomainError> {
        if find_by_id(&self.records, &cmd.sale_id).is_some() {
            return Err(DomainError::conflict("sale id already recorded"));
        }
        if cmd.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if cmd.item.trim().is_empty() {
            return Err(DomainError::validation("item cannot be empty"));
        }

        let revenue = cmd.price.times(cmd.quantity)?;

        Ok(vec![SalesEvent::SaleRecorded(SaleRecorded {
            record: SaleRecord {
                sale_id: cmd.sale_id,
                date: cmd.occurred_at,
                item_id: cmd.item_id,
                item: cmd.item.clone(),
                quantity: cmd.quantity,
                price: cmd.price,
                revenue,
            },
        })])
    }
}
