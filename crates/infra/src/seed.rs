//! Literal rows a fresh session starts with.
//!
//! Seed sales are booked straight into the sales ledger: they describe
//! history that the seed stock levels already reflect, so they do not touch
//! inventory.

use chrono::{DateTime, Duration, TimeZone, Utc};

use retaildesk_core::{DomainError, Money};
use retaildesk_events::{execute, Projection};
use retaildesk_inventory::{CreateItem, InventoryCommand, ItemId};
use retaildesk_parties::{AddSupplier, SupplierCommand, SupplierId};
use retaildesk_sales::{RecordSale, SaleId, SalesCommand};

use crate::command_dispatcher::DispatchError;
use crate::config::SeedVariant;
use crate::session::Session;

/// (name, stock, unit price)
pub const SEED_ITEMS: [(&str, i64, u64); 5] = [
    ("Rice", 50, 40),
    ("Sugar", 20, 50),
    ("Oil", 10, 120),
    ("Wheat", 40, 35),
    ("Milk", 15, 25),
];

pub const CLASSIC_SUPPLIERS: [(&str, &str); 2] =
    [("ABC Traders", "9876543210"), ("XYZ Foods", "9123456780")];

pub const SIDEBAR_SUPPLIERS: [(&str, &str); 2] =
    [("Fresh Farms", "9000000001"), ("Oil Depot", "9000000002")];

/// (item, quantity); one sale per day starting at [`seed_epoch`].
pub const CLASSIC_SALES: [(&str, i64); 5] = [
    ("Rice", 5),
    ("Sugar", 3),
    ("Oil", 2),
    ("Milk", 4),
    ("Rice", 6),
];

/// 2025-08-01T00:00:00Z, the date of the first seed sale.
pub fn seed_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub(crate) fn load(session: &mut Session) -> Result<(), DispatchError> {
    let epoch = seed_epoch();

    for (name, stock, price) in SEED_ITEMS {
        let cmd = InventoryCommand::CreateItem(CreateItem {
            item_id: ItemId::generate(),
            name: name.to_string(),
            stock,
            price: Money::from_units(price),
            occurred_at: epoch,
        });
        execute(&mut session.inventory, &cmd)?;
    }

    let suppliers: &[(&str, &str)] = match session.config.seed {
        SeedVariant::Classic => &CLASSIC_SUPPLIERS,
        SeedVariant::Sidebar => &SIDEBAR_SUPPLIERS,
    };
    for (name, contact) in suppliers {
        let cmd = SupplierCommand::AddSupplier(AddSupplier {
            supplier_id: SupplierId::generate(),
            name: name.to_string(),
            contact: contact.to_string(),
            occurred_at: epoch,
        });
        execute(&mut session.suppliers, &cmd)?;
    }

    if session.config.seed == SeedVariant::Classic {
        for (day, (name, quantity)) in CLASSIC_SALES.into_iter().enumerate() {
            let item_id = session.inventory.resolve(name)?;
            let item = session
                .inventory
                .get(item_id)
                .ok_or_else(|| DomainError::not_found(format!("item {name:?}")))?;
            let cmd = SalesCommand::RecordSale(RecordSale {
                sale_id: SaleId::generate(),
                item_id,
                item: item.name().to_string(),
                quantity,
                price: item.price(),
                occurred_at: epoch + Duration::days(day as i64),
            });
            for event in execute(&mut session.sales, &cmd)? {
                session.monthly.apply(&event);
            }
        }
    }

    tracing::debug!(
        seed = ?session.config.seed,
        items = session.inventory.len(),
        suppliers = session.suppliers.len(),
        sales = session.sales.len(),
        "session seeded"
    );

    Ok(())
}
