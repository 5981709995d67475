//! # Spots Subcommand
//!
//! Prints the configured spot inventory followed by per-category counts.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use pklot_core::Clock;
use pklot_facility::ParkingFacility;

use crate::CliContext;

/// Render the inventory table for `facility`.
pub fn render_spots<C: Clock>(facility: &ParkingFacility<C>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", facility.name(), facility.currency());
    let _ = writeln!(out, "{:<8} {:<14} {:>8}  STATUS", "SPOT", "CATEGORY", "PRICE");
    for spot in facility.spots() {
        let status = match spot.occupant() {
            Some(vehicle) => format!("occupied by {vehicle}"),
            None => "free".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<8} {:<14} {:>8}  {status}",
            spot.id().to_string(),
            spot.category().to_string(),
            spot.price().to_string(),
        );
    }
    out.push('\n');
    for occ in facility.occupancy() {
        let _ = writeln!(out, "{:<14} {}/{} free", occ.category.to_string(), occ.free, occ.total);
    }
    out
}

/// Execute `pklot spots`.
pub fn run_spots(ctx: &CliContext) -> Result<u8> {
    let facility =
        ParkingFacility::from_config_system(&ctx.config).context("failed to build facility")?;
    print!("{}", render_spots(&facility));
    Ok(0)
}
