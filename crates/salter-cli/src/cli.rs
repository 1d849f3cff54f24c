//! CLI argument definitions.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `status` | Market open/close status |
//! | `summary` | Market summary figures |
//! | `index` | NEPSE index snapshot |
//! | `gainers` | Top gainers |
//! | `losers` | Top losers |
//! | `all` | Status, index, gainers, and losers in one shot |

use clap::{Parser, Subcommand};

/// Command-line access to Nepal Stock Exchange data.
#[derive(Debug, Parser)]
#[command(
    name = "salter",
    author,
    version,
    about = "NEPSE market data from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Limit the number of rows shown for top-performer lists.
    #[arg(long, global = true, default_value_t = 5)]
    pub limit: usize,

    /// Emit raw JSON instead of formatted output.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Disable the response cache for this invocation.
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Override the exchange base URL (useful against mirrors).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show market open/close status.
    Status,
    /// Show market summary figures.
    Summary,
    /// Show the NEPSE index.
    Index,
    /// Show top gainers.
    Gainers,
    /// Show top losers.
    Losers,
    /// Show status, index, gainers, and losers together.
    All,
}
