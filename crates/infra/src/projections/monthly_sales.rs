use std::collections::BTreeMap;

use serde::Serialize;

use retaildesk_core::{DomainError, DomainResult, Money};
use retaildesk_events::Projection;
use retaildesk_sales::{SaleRecord, SalesEvent};

/// One month of aggregated sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRow {
    /// `YYYY-MM`.
    pub month: String,
    pub quantity: i64,
    pub revenue: Money,
}

/// Sales grouped by calendar month, ascending. Never empty: "no data" is `None`
/// at the call sites that build it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    rows: Vec<MonthRow>,
}

impl MonthlyReport {
    pub fn rows(&self) -> &[MonthRow] {
        &self.rows
    }

    /// Chart series keyed by month: units sold.
    pub fn quantity_series(&self) -> Vec<(String, i64)> {
        self.rows.iter().map(|r| (r.month.clone(), r.quantity)).collect()
    }

    /// Chart series keyed by month: revenue.
    pub fn revenue_series(&self) -> Vec<(String, Money)> {
        self.rows.iter().map(|r| (r.month.clone(), r.revenue)).collect()
    }

    pub fn total_quantity(&self) -> i64 {
        self.rows.iter().map(|r| r.quantity).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MonthTotals {
    quantity: i64,
    revenue: Money,
}

/// Incrementally maintained monthly sales view.
///
/// `BTreeMap` keys are `YYYY-MM` strings, so iteration order is month order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySalesProjection {
    months: BTreeMap<String, MonthTotals>,
}

impl MonthlySalesProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full scan over a ledger's records.
    pub fn rebuild<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> Self {
        let mut projection = Self::new();
        for record in records {
            projection.add(record);
        }
        projection
    }

    pub fn report(&self) -> Option<MonthlyReport> {
        if self.months.is_empty() {
            return None;
        }
        let rows = self
            .months
            .iter()
            .map(|(month, totals)| MonthRow {
                month: month.clone(),
                quantity: totals.quantity,
                revenue: totals.revenue,
            })
            .collect();
        Some(MonthlyReport { rows })
    }

    /// Fails when `event` would overflow its month's totals. Nothing is changed.
    pub fn check(&self, event: &SalesEvent) -> DomainResult<()> {
        match event {
            SalesEvent::SaleRecorded(e) => self.totals_after(&e.record).map(|_| ()),
        }
    }

    fn totals_after(&self, record: &SaleRecord) -> DomainResult<MonthTotals> {
        let current = self.months.get(&record.month()).copied().unwrap_or_default();
        let quantity = current.quantity.checked_add(record.quantity).ok_or_else(|| {
            DomainError::invariant(format!("quantity total for {} overflows", record.month()))
        })?;
        let revenue = current.revenue.checked_add(record.revenue)?;
        Ok(MonthTotals { quantity, revenue })
    }

    // Quantity and revenue move together or not at all.
    fn add(&mut self, record: &SaleRecord) {
        match self.totals_after(record) {
            Ok(totals) => {
                self.months.insert(record.month(), totals);
            }
            Err(err) => {
                tracing::error!(month = %record.month(), "month totals not updated: {err}")
            }
        }
    }
}

impl Projection for MonthlySalesProjection {
    type Ev = SalesEvent;

    fn apply(&mut self, event: &Self::Ev) {
        match event {
            SalesEvent::SaleRecorded(e) => self.add(&e.record),
        }
    }
}

/// Pure read-only projection over the sales ledger. `None` when there are no sales.
pub fn monthly_report(records: &[SaleRecord]) -> Option<MonthlyReport> {
    MonthlySalesProjection::rebuild(records).report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use retaildesk_inventory::ItemId;
    use retaildesk_sales::{SaleId, SaleRecorded};

    fn record(year: i32, month: u32, day: u32, quantity: i64, price: u64) -> SaleRecord {
        let price = Money::from_units(price);
        SaleRecord {
            sale_id: SaleId::generate(),
            date: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
            item_id: ItemId::generate(),
            item: "Rice".to_string(),
            quantity,
            price,
            revenue: price.times(quantity).unwrap(),
        }
    }

    #[test]
    fn no_sales_means_no_data() {
        assert!(monthly_report(&[]).is_none());
        assert!(MonthlySalesProjection::new().report().is_none());
    }

    #[test]
    fn same_month_sales_collapse_into_one_row() {
        let records = vec![record(2025, 8, 1, 5, 40), record(2025, 8, 20, 3, 50)];
        let report = monthly_report(&records).unwrap();

        assert_eq!(
            report.rows(),
            &[MonthRow {
                month: "2025-08".to_string(),
                quantity: 8,
                revenue: Money::from_units(350),
            }]
        );
    }

    #[test]
    fn months_are_ordered_ascending() {
        let records = vec![
            record(2025, 10, 2, 1, 10),
            record(2024, 12, 31, 2, 10),
            record(2025, 1, 1, 3, 10),
        ];
        let report = monthly_report(&records).unwrap();
        let months: Vec<_> = report.rows().iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["2024-12", "2025-01", "2025-10"]);
        assert_eq!(report.total_quantity(), 6);
    }

    #[test]
    fn series_are_keyed_by_month() {
        let records = vec![record(2025, 8, 1, 5, 40), record(2025, 9, 1, 2, 120)];
        let report = monthly_report(&records).unwrap();

        assert_eq!(
            report.quantity_series(),
            vec![("2025-08".to_string(), 5), ("2025-09".to_string(), 2)]
        );
        assert_eq!(
            report.revenue_series(),
            vec![
                ("2025-08".to_string(), Money::from_units(200)),
                ("2025-09".to_string(), Money::from_units(240)),
            ]
        );
    }

    #[test]
    fn overflowing_month_is_refused_and_left_untouched() {
        let mut projection = MonthlySalesProjection::rebuild(&[record(2025, 9, 1, i64::MAX, 1)]);
        let before = projection.clone();
        let event = SalesEvent::SaleRecorded(SaleRecorded {
            record: record(2025, 9, 2, 1, 1),
        });

        let err = projection.check(&event).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        projection.apply(&event);
        assert_eq!(projection, before);

        let october = SalesEvent::SaleRecorded(SaleRecorded {
            record: record(2025, 10, 1, 1, 1),
        });
        assert!(projection.check(&october).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: applying SaleRecorded events one by one yields the same
        /// report as a full scan of the resulting records.
        #[test]
        fn incremental_matches_full_scan(
            sales in prop::collection::vec(
                (2024i32..2026, 1u32..=12, 1u32..=28, 1i64..100, 0u64..500),
                0..40,
            )
        ) {
            let records: Vec<SaleRecord> = sales
                .iter()
                .map(|(y, m, d, q, p)| record(*y, *m, *d, *q, *p))
                .collect();

            let mut incremental = MonthlySalesProjection::new();
            for r in &records {
                incremental.apply(&SalesEvent::SaleRecorded(SaleRecorded { record: r.clone() }));
            }

            prop_assert_eq!(incremental.report(), monthly_report(&records));
            if let Some(report) = incremental.report() {
                let total: i64 = records.iter().map(|r| r.quantity).sum();
                prop_assert_eq!(report.total_quantity(), total);
            }
        }
    }
}
