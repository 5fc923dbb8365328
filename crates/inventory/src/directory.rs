use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retaildesk_core::{
    find_by_id, Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, Money,
};
use retaildesk_events::Event;

use crate::item::{InventoryItem, ItemId, StockPolicy};

/// Identifier of the inventory directory owned by one session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryId(pub AggregateId);

impl InventoryId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

/// Aggregate root: the inventory directory.
///
/// Rows keep insertion order. Names are not unique; every row has its own
/// [`ItemId`] and name lookups go through [`Inventory::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    id: InventoryId,
    items: Vec<InventoryItem>,
    version: u64,
}

impl Inventory {
    pub fn empty(id: InventoryId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: ItemId) -> Option<&InventoryItem> {
        find_by_id(&self.items, &item_id)
    }

    /// Resolve a display name to exactly one row.
    ///
    /// No match is `NotFound`; several rows with the same name is a `Conflict`
    /// the caller must settle by addressing the row by id.
    pub fn resolve(&self, name: &str) -> DomainResult<ItemId> {
        let name = name.trim();
        let mut matches = self.items.iter().filter(|i| i.name() == name);
        let first = matches
            .next()
            .ok_or_else(|| DomainError::not_found(format!("item {name:?}")))?;
        if matches.next().is_some() {
            return Err(DomainError::conflict(format!(
                "ambiguous item name {name:?}; address the row by id"
            )));
        }
        Ok(first.id_typed())
    }

    /// Rows with stock strictly below `threshold`, in insertion order.
    pub fn low_stock(&self, threshold: i64) -> Vec<&InventoryItem> {
        self.items
            .iter()
            .filter(|i| i.is_low_stock(threshold))
            .collect()
    }

    fn get_required(&self, item_id: ItemId) -> DomainResult<&InventoryItem> {
        self.get(item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {item_id}")))
    }
}

impl AggregateRoot for Inventory {
    type Id = InventoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItem {
    pub item_id: ItemId,
    pub name: String,
    pub stock: i64,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub item_id: ItemId,
    pub delta: i64,
    pub policy: StockPolicy,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    CreateItem(CreateItem),
    AdjustStock(AdjustStock),
}

/// Event: ItemCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreated {
    pub item_id: ItemId,
    pub name: String,
    pub stock: i64,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub item_id: ItemId,
    pub name: String,
    pub delta: i64,
    pub new_stock: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemCreated(ItemCreated),
    StockAdjusted(StockAdjusted),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemCreated(_) => "inventory.item.created",
            InventoryEvent::StockAdjusted(_) => "inventory.item.stock_adjusted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemCreated(e) => e.occurred_at,
            InventoryEvent::StockAdjusted(e) => e.occurred_at,
        }
    }

    fn describe(&self) -> String {
        match self {
            InventoryEvent::ItemCreated(e) => format!(
                "Item added: {} ({} in stock at {})",
                e.name, e.stock, e.price
            ),
            InventoryEvent::StockAdjusted(e) => format!(
                "Stock adjusted: {} {:+} (now {})",
                e.name, e.delta, e.new_stock
            ),
        }
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemCreated(e) => {
                self.items.push(InventoryItem::new(
                    e.item_id,
                    e.name.clone(),
                    e.stock,
                    e.price,
                ));
            }
            InventoryEvent::StockAdjusted(e) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id_typed() == e.item_id) {
                    item.set_stock(e.new_stock);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::CreateItem(cmd) => self.handle_create(cmd),
            InventoryCommand::AdjustStock(cmd) => self.handle_adjust(cmd),
        }
    }
}

impl Inventory {
    fn handle_create(&self, cmd: &CreateItem) -> Result<Vec<InventoryEvent>, DomainError> {
        if self.get(cmd.item_id).is_some() {
            return Err(DomainError::conflict("item id already exists"));
        }
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if cmd.stock < 0 {
            return Err(DomainError::validation("initial stock cannot be negative"));
        }
        Ok(vec![InventoryEvent::ItemCreated(ItemCreated {
            item_id: cmd.item_id,
            name: name.to_string(),
            stock: cmd.stock,
            price: cmd.price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustStock) -> Result<Vec<InventoryEvent>, DomainError> {
        let item = self.get_required(cmd.item_id)?;

        if cmd.delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }

        let new_stock = item.stock_after(cmd.delta, cmd.policy)?;

        Ok(vec![InventoryEvent::StockAdjusted(StockAdjusted {
            item_id: cmd.item_id,
            name: item.name().to_string(),
            delta: cmd.delta,
            new_stock,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use chrono::TimeZone;
    use retaildesk_events::execute;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap()
    }

    fn test_inventory() -> Inventory {
        Inventory::empty(InventoryId::new(AggregateId::new()))
    }

    fn create(inv: &mut Inventory, name: &str, stock: i64, price: u64) -> ItemId {
        let item_id = ItemId::generate();
        let cmd = CreateItem {
            item_id,
            name: name.to_string(),
            stock,
            price: Money::from_units(price),
            occurred_at: test_time(),
        };
        execute(inv, &InventoryCommand::CreateItem(cmd)).unwrap();
        item_id
    }

    fn adjust(item_id: ItemId, delta: i64, policy: StockPolicy) -> InventoryCommand {
        InventoryCommand::AdjustStock(AdjustStock {
            item_id,
            delta,
            policy,
            occurred_at: test_time(),
        })
    }

    fn seeded() -> Inventory {
        let mut inv = test_inventory();
        create(&mut inv, "Rice", 50, 40);
        create(&mut inv, "Sugar", 20, 50);
        create(&mut inv, "Oil", 10, 120);
        create(&mut inv, "Wheat", 40, 35);
        create(&mut inv, "Milk", 15, 25);
        inv
    }

    #[test]
    fn create_item_appends_row_with_trimmed_name() {
        let mut inv = test_inventory();
        let id = create(&mut inv, "  Tea ", 5, 80);

        let item = inv.get(id).unwrap();
        assert_eq!(item.name(), "Tea");
        assert_eq!(item.stock(), 5);
        assert_eq!(item.price(), Money::from_units(80));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn create_item_requires_a_name() {
        let inv = test_inventory();
        let cmd = CreateItem {
            item_id: ItemId::generate(),
            name: "   ".to_string(),
            stock: 1,
            price: Money::from_units(1),
            occurred_at: test_time(),
        };
        let err = inv.handle(&InventoryCommand::CreateItem(cmd)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_item_rejects_negative_initial_stock() {
        let inv = test_inventory();
        let cmd = CreateItem {
            item_id: ItemId::generate(),
            name: "Salt".to_string(),
            stock: -1,
            price: Money::from_units(1),
            occurred_at: test_time(),
        };
        let err = inv.handle(&InventoryCommand::CreateItem(cmd)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicate_names_create_separate_rows() {
        let mut inv = test_inventory();
        let a = create(&mut inv, "Rice", 50, 40);
        let b = create(&mut inv, "Rice", 7, 45);

        assert_ne!(a, b);
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.get(b).unwrap().stock(), 7);
    }

    #[test]
    fn resolve_reports_missing_and_ambiguous_names() {
        let mut inv = test_inventory();
        let rice = create(&mut inv, "Rice", 50, 40);
        assert_eq!(inv.resolve("Rice").unwrap(), rice);
        assert_eq!(inv.resolve(" Rice ").unwrap(), rice);

        assert!(matches!(inv.resolve("Tea"), Err(DomainError::NotFound(_))));

        create(&mut inv, "Rice", 1, 40);
        assert!(matches!(inv.resolve("Rice"), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn adjust_stock_updates_only_the_addressed_row() {
        let mut inv = test_inventory();
        let a = create(&mut inv, "Rice", 50, 40);
        let b = create(&mut inv, "Rice", 50, 40);

        let events = execute(&mut inv, &adjust(b, -5, StockPolicy::AllowNegative)).unwrap();

        assert_eq!(inv.get(a).unwrap().stock(), 50);
        assert_eq!(inv.get(b).unwrap().stock(), 45);
        match &events[0] {
            InventoryEvent::StockAdjusted(e) => {
                assert_eq!(e.new_stock, 45);
                assert_eq!(e.delta, -5);
            }
            other => panic!("Expected StockAdjusted, got {other:?}"),
        }
    }

    #[test]
    fn oversell_goes_negative_when_allowed() {
        let mut inv = test_inventory();
        let oil = create(&mut inv, "Oil", 10, 120);
        execute(&mut inv, &adjust(oil, -12, StockPolicy::AllowNegative)).unwrap();
        assert_eq!(inv.get(oil).unwrap().stock(), -2);
    }

    #[test]
    fn oversell_is_rejected_under_strict_policy_without_mutation() {
        let mut inv = test_inventory();
        let oil = create(&mut inv, "Oil", 10, 120);
        let before = inv.clone();

        let err = execute(&mut inv, &adjust(oil, -12, StockPolicy::RejectNegative)).unwrap_err();

        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(inv, before);
    }

    #[test]
    fn zero_delta_is_rejected() {
        let mut inv = test_inventory();
        let oil = create(&mut inv, "Oil", 10, 120);
        let err = inv.handle(&adjust(oil, 0, StockPolicy::AllowNegative)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn adjust_unknown_item_is_not_found() {
        let inv = seeded();
        let err = inv
            .handle(&adjust(ItemId::generate(), 1, StockPolicy::AllowNegative))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn low_stock_on_seed_data_excludes_the_boundary() {
        let inv = seeded();
        let names: Vec<_> = inv
            .low_stock(crate::DEFAULT_LOW_STOCK_THRESHOLD)
            .iter()
            .map(|i| (i.name().to_string(), i.stock()))
            .collect();
        assert_eq!(names, vec![("Oil".to_string(), 10), ("Milk".to_string(), 15)]);
    }

    #[test]
    fn low_stock_is_a_pure_read() {
        let inv = seeded();
        let before = inv.clone();
        let first: Vec<InventoryItem> = inv.low_stock(20).into_iter().cloned().collect();
        let second: Vec<InventoryItem> = inv.low_stock(20).into_iter().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(inv, before);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let inv = seeded();
        let rice = inv.resolve("Rice").unwrap();
        let version = inv.version();

        let cmd = adjust(rice, -5, StockPolicy::AllowNegative);
        let e1 = inv.handle(&cmd).unwrap();
        let e2 = inv.handle(&cmd).unwrap();

        assert_eq!(e1, e2);
        assert_eq!(e1[0].event_type(), "inventory.item.stock_adjusted");
        assert_eq!(inv.version(), version);
        assert_eq!(inv.get(rice).unwrap().stock(), 50);
    }

    #[test]
    fn version_increments_on_apply() {
        let mut inv = test_inventory();
        assert_eq!(inv.version(), 0);
        let rice = create(&mut inv, "Rice", 50, 40);
        assert_eq!(inv.version(), 1);
        execute(&mut inv, &adjust(rice, 3, StockPolicy::AllowNegative)).unwrap();
        assert_eq!(inv.version(), 2);
    }

    #[test]
    fn describe_reads_like_a_confirmation() {
        let mut inv = test_inventory();
        let oil = create(&mut inv, "Oil", 10, 120);
        let events = execute(&mut inv, &adjust(oil, 10, StockPolicy::AllowNegative)).unwrap();
        assert_eq!(events[0].describe(), "Stock adjusted: Oil +10 (now 20)");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: under AllowNegative, final stock is the initial stock plus
        /// the sum of all non-zero deltas.
        #[test]
        fn stock_tracks_sum_of_deltas(
            initial in 0i64..1_000,
            deltas in prop::collection::vec(-500i64..500i64, 0..30)
        ) {
            let mut inv = test_inventory();
            let id = create(&mut inv, "Rice", initial, 40);

            let mut expected = initial;
            for delta in deltas.into_iter().filter(|d| *d != 0) {
                execute(&mut inv, &adjust(id, delta, StockPolicy::AllowNegative)).unwrap();
                expected += delta;
            }

            prop_assert_eq!(inv.get(id).unwrap().stock(), expected);
        }

        /// Property: under RejectNegative, stock never drops below zero whatever
        /// sequence of adjustments is attempted.
        #[test]
        fn strict_policy_never_goes_negative(
            initial in 0i64..100,
            deltas in prop::collection::vec(-50i64..50i64, 0..30)
        ) {
            let mut inv = test_inventory();
            let id = create(&mut inv, "Oil", initial, 120);

            for delta in deltas {
                let _ = execute(&mut inv, &adjust(id, delta, StockPolicy::RejectNegative));
                prop_assert!(inv.get(id).unwrap().stock() >= 0);
            }
        }
    }
}
