// ============================================================================
// CLI Module
// Command-line surface: argument parsing and dispatch to the calculator
// ============================================================================

use clap::{Args, Parser, Subcommand};
use std::ffi::{OsStr, OsString};

use crate::encoding::EncodedHex;
use crate::yields::{YieldCalculator, YieldError, YieldResult};

/// Deterministic yield figures encoded as 256-bit hex words
#[derive(Debug, Parser)]
#[command(name = "yield-oracle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// principal × (1 + rate/10^6) ^ (time/86400)
    #[command(name = "compound_yield")]
    CompoundYield(YieldArgs),

    /// principal + principal × rate × time / (10^6 × 86400)
    #[command(name = "linear_yield")]
    LinearYield(YieldArgs),

    /// compound(pool) × 10^18 / supply
    #[command(name = "share_price")]
    SharePrice(SharePriceArgs),
}

#[derive(Debug, Args)]
pub struct YieldArgs {
    /// Principal amount
    #[arg(allow_hyphen_values = true)]
    pub principal: String,

    /// Daily rate in parts per million
    #[arg(allow_hyphen_values = true)]
    pub rate_ppm: String,

    /// Elapsed time in seconds
    #[arg(allow_hyphen_values = true)]
    pub time_seconds: String,
}

#[derive(Debug, Args)]
pub struct SharePriceArgs {
    /// Pool assets before growth
    #[arg(allow_hyphen_values = true)]
    pub pool_size: String,

    /// Outstanding shares
    #[arg(allow_hyphen_values = true)]
    pub total_supply: String,

    /// Daily rate in parts per million
    #[arg(allow_hyphen_values = true)]
    pub rate_ppm: String,

    /// Elapsed time in seconds
    #[arg(allow_hyphen_values = true)]
    pub time_seconds: String,
}

impl Command {
    /// Number of positional values a command name takes.
    pub fn arity(name: &OsStr) -> Option<usize> {
        match name.to_str()? {
            "compound_yield" | "linear_yield" => Some(3),
            "share_price" => Some(4),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CompoundYield(_) => "compound_yield",
            Command::LinearYield(_) => "linear_yield",
            Command::SharePrice(_) => "share_price",
        }
    }

    /// Run the command with a default-context calculator.
    pub fn execute(&self, calculator: &YieldCalculator) -> YieldResult<EncodedHex> {
        match self {
            Command::CompoundYield(a) => {
                calculator.compound_yield_str(&a.principal, &a.rate_ppm, &a.time_seconds)
            }
            Command::LinearYield(a) => {
                calculator.linear_yield_str(&a.principal, &a.rate_ppm, &a.time_seconds)
            }
            Command::SharePrice(a) => calculator.share_price_str(
                &a.pool_size,
                &a.total_supply,
                &a.rate_ppm,
                &a.time_seconds,
            ),
        }
    }
}

/// Parse a full argument vector (program name first) and compute the result.
///
/// Every argument after a known command name is a value, so `--` and
/// `--help` in that position count toward the arity like any other word.
///
/// # Errors
/// A wrong argument count and any clap failure, including `--help` and
/// `--version`, are a [`YieldError::Usage`]; calculator failures pass through.
pub fn run<I, T>(args: I) -> YieldResult<EncodedHex>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if let Some(arity) = args.get(1).and_then(|name| Command::arity(name)) {
        let given = args.len() - 2;
        if given != arity {
            return Err(YieldError::Usage(format!(
                "{} takes {arity} arguments, got {given}",
                args[1].to_string_lossy()
            )));
        }
        args.insert(2, OsString::from("--"));
    }

    let cli = Cli::try_parse_from(args).map_err(|err| YieldError::Usage(err.kind().to_string()))?;
    tracing::debug!(command = cli.command.name(), "dispatching");
    cli.command.execute(&YieldCalculator::default())
}
