//! # Quote Subcommand
//!
//! Prices a hypothetical stay without touching any facility state:
//!
//! ```text
//! amount = price * max(1, ceil(minutes / unit_minutes))
//! ```

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Args;
use pklot_core::{Amount, Currency};
use pklot_facility::BillingCalculator;
use serde::Serialize;

use crate::CliContext;

/// Arguments for `pklot quote`.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Spot price per billing unit, in minor currency units.
    #[arg(long)]
    pub price: u64,

    /// Length of the stay in minutes.
    #[arg(long, allow_negative_numbers = true)]
    pub minutes: i64,

    /// Billing unit in minutes. Defaults to the facility's unit.
    #[arg(long)]
    pub unit_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub price: Amount,
    pub minutes: i64,
    pub unit_minutes: i64,
    pub billed_units: u64,
    pub amount: Amount,
    pub currency: Currency,
}

/// Price the stay described by `args`.
pub fn quote(args: &QuoteArgs, ctx: &CliContext) -> Result<Quote> {
    let billing = match args.unit_minutes {
        Some(unit) => {
            let unit = Duration::try_minutes(unit).context("unit_minutes out of range")?;
            BillingCalculator::new(unit).context("invalid billing unit")?
        }
        None => ctx
            .config
            .billing_calculator()
            .context("invalid facility billing unit")?,
    };
    let stay = Duration::try_minutes(args.minutes).context("minutes out of range")?;
    let billed_units = billing.units_for(stay);
    let price = Amount(args.price);
    let amount = price
        .checked_mul(billed_units)
        .context("quoted amount overflows")?;

    Ok(Quote {
        price,
        minutes: args.minutes,
        unit_minutes: billing.unit().num_minutes(),
        billed_units,
        amount,
        currency: ctx.config.currency.clone(),
    })
}

/// Execute `pklot quote`.
pub fn run_quote(args: &QuoteArgs, ctx: &CliContext) -> Result<u8> {
    let quote = quote(args, ctx)?;
    println!(
        "{}",
        serde_json::to_string(&quote).context("failed to encode quote")?
    );
    Ok(0)
}
