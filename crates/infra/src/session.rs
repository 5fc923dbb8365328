//! The session: one explicitly owned value holding every table.
//!
//! Nothing is global. The presentation layer owns a `Session`, reads from it
//! to render, and mutates it only through [`Session::dispatch`].

use retaildesk_core::AggregateId;
use retaildesk_inventory::{Inventory, InventoryId, InventoryItem};
use retaildesk_parties::{SupplierDirectory, SupplierDirectoryId};
use retaildesk_sales::{SalesLedger, SalesLedgerId};

use crate::command_dispatcher::DispatchError;
use crate::config::SessionConfig;
use crate::projections::monthly_sales::{MonthlyReport, MonthlySalesProjection};
use crate::seed;

#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: SessionConfig,
    pub(crate) inventory: Inventory,
    pub(crate) sales: SalesLedger,
    pub(crate) suppliers: SupplierDirectory,
    pub(crate) monthly: MonthlySalesProjection,
}

impl Session {
    /// A session with empty tables.
    pub fn empty(config: SessionConfig) -> Self {
        Self {
            config,
            inventory: Inventory::empty(InventoryId::new(AggregateId::new())),
            sales: SalesLedger::empty(SalesLedgerId::new(AggregateId::new())),
            suppliers: SupplierDirectory::empty(SupplierDirectoryId::new(AggregateId::new())),
            monthly: MonthlySalesProjection::new(),
        }
    }

    /// A session loaded with the seed rows of `config.seed`.
    pub fn seeded(config: SessionConfig) -> Result<Self, DispatchError> {
        let mut session = Self::empty(config);
        seed::load(&mut session)?;
        Ok(session)
    }

    /// Drop every change and return to the seed state.
    pub fn reset(&mut self) -> Result<(), DispatchError> {
        *self = Self::seeded(self.config.clone())?;
        tracing::info!(seed = ?self.config.seed, "session reset");
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn sales(&self) -> &SalesLedger {
        &self.sales
    }

    pub fn suppliers(&self) -> &SupplierDirectory {
        &self.suppliers
    }

    /// Items below the configured threshold. Pure read.
    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        self.inventory.low_stock(self.config.low_stock_threshold)
    }

    /// Monthly sales totals, or `None` when no sale exists.
    pub fn monthly_report(&self) -> Option<MonthlyReport> {
        self.monthly.report()
    }
}
