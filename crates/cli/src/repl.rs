//! Line-oriented command loop.
//!
//! Every input line is split into words (double quotes group words), parsed
//! with clap and turned into at most one [`SessionCommand`] dispatch.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use retaildesk_core::Money;
use retaildesk_infra::{ItemRef, Outcome, Session, SessionCommand, SupplierRef};

use crate::render;

#[derive(Debug, Parser)]
#[command(name = "retaildesk", no_binary_name = true, disable_version_flag = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReplCommand {
    /// Show every inventory row
    Inventory,
    /// Show the sales ledger
    Sales,
    /// Show the supplier directory
    Suppliers,
    /// Show items below the low-stock threshold
    LowStock,
    /// Show monthly sales totals
    Report,
    /// Draw monthly quantity and revenue bar charts
    Chart,
    /// Add an inventory item
    AddItem {
        /// Item name
        name: String,
        /// Opening stock
        stock: i64,
        /// Unit price (e.g. 40 or 12.50)
        price: Money,
    },
    /// Record a sale (reduces stock)
    Sell {
        /// Item name, or #row from the inventory table
        item: String,
        /// Units sold
        quantity: i64,
        /// Sale date (YYYY-MM-DD); defaults to now
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Record a purchase (restocks; no ledger row)
    Purchase {
        /// Item name, or #row from the inventory table
        item: String,
        /// Units received
        quantity: i64,
        /// Supplier name, or #row from the supplier table
        #[arg(long)]
        supplier: String,
    },
    /// Add a supplier (ignored unless both fields are non-empty)
    AddSupplier {
        name: String,
        contact: String,
    },
    /// Discard all changes and reload the seed data
    Reset,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the loop should keep reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Output options for dispatch results.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReplOptions {
    /// Print the emitted events as JSON after each confirmation.
    pub json_events: bool,
    /// Print a `> ` prompt before each line.
    pub prompt: bool,
}

/// Split a line into words. Double quotes group words and are removed.
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        bail!("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// `#n` refers to the n-th row (1-based) of a listed table.
fn row_number(raw: &str) -> Option<Result<usize>> {
    let digits = raw.strip_prefix('#')?;
    Some(
        digits
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .with_context(|| format!("invalid row reference {raw:?}")),
    )
}

fn item_ref(session: &Session, raw: &str) -> Result<ItemRef> {
    match row_number(raw) {
        Some(n) => {
            let n = n?;
            let item = session
                .inventory()
                .items()
                .get(n - 1)
                .with_context(|| format!("no inventory row #{n}"))?;
            Ok(ItemRef::Id(item.id_typed()))
        }
        None => Ok(ItemRef::Name(raw.to_string())),
    }
}

fn supplier_ref(session: &Session, raw: &str) -> Result<SupplierRef> {
    match row_number(raw) {
        Some(n) => {
            let n = n?;
            let supplier = session
                .suppliers()
                .suppliers()
                .get(n - 1)
                .with_context(|| format!("no supplier row #{n}"))?;
            Ok(SupplierRef::Id(supplier.id_typed()))
        }
        None => Ok(SupplierRef::Name(raw.to_string())),
    }
}

fn write_outcome(out: &mut impl Write, outcome: &Outcome, options: ReplOptions) -> Result<()> {
    writeln!(out, "{}", outcome.message)?;
    if options.json_events && !outcome.is_noop() {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome.events)?)?;
    }
    Ok(())
}

/// Run one parsed command against the session.
pub fn run_command(
    session: &mut Session,
    command: ReplCommand,
    out: &mut impl Write,
    options: ReplOptions,
) -> Result<Flow> {
    let dispatch = match command {
        ReplCommand::Inventory => {
            write!(out, "{}", render::inventory(session))?;
            None
        }
        ReplCommand::Sales => {
            write!(out, "{}", render::sales(session))?;
            None
        }
        ReplCommand::Suppliers => {
            write!(out, "{}", render::suppliers(session))?;
            None
        }
        ReplCommand::LowStock => {
            write!(out, "{}", render::low_stock(session))?;
            None
        }
        ReplCommand::Report => {
            write!(out, "{}", render::monthly_report(session.monthly_report().as_ref()))?;
            None
        }
        ReplCommand::Chart => {
            write!(out, "{}", render::monthly_chart(session.monthly_report().as_ref()))?;
            None
        }
        ReplCommand::Reset => {
            session.reset()?;
            writeln!(out, "Session reset to seed data")?;
            None
        }
        ReplCommand::Quit => return Ok(Flow::Quit),
        ReplCommand::AddItem { name, stock, price } => {
            Some(SessionCommand::AddInventoryItem { name, stock, price })
        }
        ReplCommand::Sell {
            item,
            quantity,
            date,
        } => Some(SessionCommand::RecordSale {
            item: item_ref(session, &item)?,
            quantity,
            date: date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
        }),
        ReplCommand::Purchase {
            item,
            quantity,
            supplier,
        } => Some(SessionCommand::RecordPurchase {
            item: item_ref(session, &item)?,
            quantity,
            supplier: supplier_ref(session, &supplier)?,
        }),
        ReplCommand::AddSupplier { name, contact } => {
            Some(SessionCommand::AddSupplier { name, contact })
        }
    };

    if let Some(command) = dispatch {
        let outcome = session.dispatch(command)?;
        write_outcome(out, &outcome, options)?;
    }
    Ok(Flow::Continue)
}

/// Parse and run one input line. Blank lines and `//` comments do nothing.
///
/// Parse errors (including `help`) are written to `out` rather than returned,
/// so the loop keeps going.
pub fn run_line(
    session: &mut Session,
    line: &str,
    out: &mut impl Write,
    options: ReplOptions,
) -> Result<Flow> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return Ok(Flow::Continue);
    }

    let words = split_words(trimmed)?;
    match ReplLine::try_parse_from(words) {
        Ok(parsed) => run_command(session, parsed.command, out, options),
        Err(err) => {
            write!(out, "{}", err.render())?;
            Ok(Flow::Continue)
        }
    }
}

/// Read lines until EOF or `quit`. Command failures are reported and skipped.
pub fn run(
    session: &mut Session,
    input: impl BufRead,
    out: &mut impl Write,
    options: ReplOptions,
) -> Result<()> {
    if options.prompt {
        write!(out, "> ")?;
        out.flush()?;
    }
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        match run_line(session, &line, out, options) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => {
                tracing::debug!("line failed: {err:#}");
                writeln!(out, "error: {err:#}")?;
            }
        }
        if options.prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    Ok(())
}
