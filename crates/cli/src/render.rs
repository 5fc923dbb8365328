//! Plain-text rendering of session tables and the monthly chart.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use retaildesk_infra::{MonthlyReport, Session};
use retaildesk_inventory::InventoryItem;

const BAR_WIDTH: usize = 40;

/// Column-aligned text table. Numeric-looking cells are right-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }
}

fn is_numeric(cell: &str) -> bool {
    !cell.is_empty() && cell.parse::<Decimal>().is_ok()
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{h:<w$}"))
            .collect();
        writeln!(f, "{}", header.join("  ").trim_end())?;

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("  "))?;

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| {
                    if is_numeric(cell) {
                        format!("{cell:>w$}")
                    } else {
                        format!("{cell:<w$}")
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}

fn item_table<'a>(items: impl IntoIterator<Item = (usize, &'a InventoryItem)>) -> Table {
    let mut table = Table::new(["#", "Item", "Stock", "Price"]);
    for (row, item) in items {
        table.push(vec![
            format!("#{row}"),
            item.name().to_string(),
            item.stock().to_string(),
            item.price().to_string(),
        ]);
    }
    table
}

pub fn inventory(session: &Session) -> String {
    item_table(session.inventory().items().iter().enumerate().map(|(i, it)| (i + 1, it)))
        .to_string()
}

/// Low-stock rows keep their inventory row numbers so they can be used in commands.
pub fn low_stock(session: &Session) -> String {
    let low = session.low_stock();
    if low.is_empty() {
        return format!(
            "No items below {} in stock.\n",
            session.config().low_stock_threshold
        );
    }
    let rows = session
        .inventory()
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| low.iter().any(|l| l.id_typed() == item.id_typed()))
        .map(|(i, item)| (i + 1, item));
    format!("Low stock items:\n{}", item_table(rows))
}

pub fn sales(session: &Session) -> String {
    let records = session.sales().records();
    if records.is_empty() {
        return "No sales recorded.\n".to_string();
    }
    let mut table = Table::new(["Date", "Item", "Quantity", "Price", "Revenue"]);
    for r in records {
        table.push(vec![
            r.date.format("%Y-%m-%d %H:%M").to_string(),
            r.item.clone(),
            r.quantity.to_string(),
            r.price.to_string(),
            r.revenue.to_string(),
        ]);
    }
    table.to_string()
}

pub fn suppliers(session: &Session) -> String {
    let mut table = Table::new(["#", "Supplier", "Contact"]);
    for (i, s) in session.suppliers().suppliers().iter().enumerate() {
        table.push(vec![
            format!("#{}", i + 1),
            s.name().to_string(),
            s.contact().to_string(),
        ]);
    }
    table.to_string()
}

pub fn monthly_report(report: Option<&MonthlyReport>) -> String {
    let Some(report) = report else {
        return "No sales data.\n".to_string();
    };
    let mut table = Table::new(["Month", "Quantity", "Revenue"]);
    for row in report.rows() {
        table.push(vec![
            row.month.clone(),
            row.quantity.to_string(),
            row.revenue.to_string(),
        ]);
    }
    table.to_string()
}

/// Horizontal bar chart; the largest value spans the full bar width.
pub fn bar_chart(title: &str, series: &[(String, Decimal)]) -> String {
    let mut out = format!("{title}\n");
    let max = series
        .iter()
        .map(|(_, v)| *v)
        .max()
        .unwrap_or(Decimal::ZERO);
    let label_width = series.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    for (label, value) in series {
        // value / max is at most 1, so scaling afterwards cannot overflow.
        let len = value
            .checked_div(max)
            .and_then(|ratio| ratio.checked_mul(Decimal::from(BAR_WIDTH)))
            .and_then(|bar| bar.round().to_usize())
            .unwrap_or(0);
        out.push_str(&format!(
            "{label:<label_width$} | {} {value}\n",
            "#".repeat(len)
        ));
    }
    out
}

/// Both chart series of the monthly report, quantity then revenue.
pub fn monthly_chart(report: Option<&MonthlyReport>) -> String {
    let Some(report) = report else {
        return "No sales data.\n".to_string();
    };
    let quantity: Vec<(String, Decimal)> = report
        .quantity_series()
        .into_iter()
        .map(|(m, q)| (m, Decimal::from(q)))
        .collect();
    let revenue: Vec<(String, Decimal)> = report
        .revenue_series()
        .into_iter()
        .map(|(m, r)| (m, r.amount().round_dp(2)))
        .collect();
    format!(
        "{}\n{}",
        bar_chart("Monthly Sales (quantity)", &quantity),
        bar_chart("Monthly Sales (revenue)", &revenue)
    )
}
