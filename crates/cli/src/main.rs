use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::{Parser, ValueEnum};

use retaildesk_cli::repl::{self, ReplOptions};
use retaildesk_infra::{SeedVariant, Session, SessionConfig};
use retaildesk_inventory::StockPolicy;
use retaildesk_observability::LogFormat;

#[derive(Debug, Copy, Clone, ValueEnum)]
enum SeedArg {
    Classic,
    Sidebar,
}

impl From<SeedArg> for SeedVariant {
    fn from(value: SeedArg) -> Self {
        match value {
            SeedArg::Classic => SeedVariant::Classic,
            SeedArg::Sidebar => SeedVariant::Sidebar,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum PolicyArg {
    /// Sales may drive stock below zero
    Allow,
    /// Reject sales that would drive stock below zero
    Reject,
}

impl From<PolicyArg> for StockPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Allow => StockPolicy::AllowNegative,
            PolicyArg::Reject => StockPolicy::RejectNegative,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, ValueEnum)]
enum LogFormatArg {
    #[default]
    Json,
    Compact,
}

/// Retail bookkeeping desk. Reads commands from stdin; type `help` for the list.
#[derive(Debug, Parser)]
#[command(name = "retaildesk", version)]
struct Cli {
    /// Seed data to start from (overrides RETAILDESK_SEED)
    #[arg(long, value_enum)]
    seed: Option<SeedArg>,

    /// Items with stock below this are reported as low (overrides RETAILDESK_LOW_STOCK_THRESHOLD)
    #[arg(long)]
    low_stock_threshold: Option<i64>,

    /// Negative stock handling (overrides RETAILDESK_STOCK_POLICY)
    #[arg(long, value_enum)]
    stock_policy: Option<PolicyArg>,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormatArg::Json)]
    log_format: LogFormatArg,

    /// Log every accepted command (info level)
    #[arg(short, long)]
    verbose: bool,

    /// Print emitted events as JSON after each change
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = match cli.log_format {
        LogFormatArg::Json => LogFormat::Json,
        LogFormatArg::Compact => LogFormat::Compact,
    };
    retaildesk_observability::init(if cli.verbose { "info" } else { "warn" }, format);

    let mut config = SessionConfig::from_env().context("invalid environment configuration")?;
    if let Some(seed) = cli.seed {
        config.seed = seed.into();
    }
    if let Some(threshold) = cli.low_stock_threshold {
        config.low_stock_threshold = threshold;
    }
    if let Some(policy) = cli.stock_policy {
        config.stock_policy = policy.into();
    }
    tracing::debug!(?config, "starting session");

    let mut session = Session::seeded(config).context("failed to load seed data")?;

    let stdin = io::stdin();
    let options = ReplOptions {
        json_events: cli.json,
        prompt: stdin.is_terminal(),
    };
    repl::run(&mut session, stdin.lock(), &mut io::stdout().lock(), options)
}
