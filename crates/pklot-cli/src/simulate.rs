//! # Simulate Subcommand
//!
//! Replays a scripted sequence of gate events against a freshly built
//! facility whose clock is driven by the script, not the wall clock.
//!
//! ```yaml
//! start: "2026-01-15T08:00:00Z"
//! events:
//!   - { at_minutes: 0,  action: admit,   vehicle: KA01AB1234, category: two_wheeler }
//!   - { at_minutes: 90, action: release, vehicle: KA01AB1234 }
//! ```
//!
//! Each event produces one JSON line. Rejections (lot full, vehicle not
//! parked) are outcomes, not failures: the replay continues. A malformed
//! script or a time that runs backwards aborts the run.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Duration;
use clap::Args;
use pklot_core::{
    Amount, Clock, Currency, ManualClock, SpotId, TicketId, Timestamp, VehicleCategory, VehicleId,
};
use pklot_facility::{FacilityConfig, ParkingFacility, Vehicle};
use pklot_payment::{PaymentReceipt, PaymentService};
use serde::{Deserialize, Serialize};

use crate::CliContext;

/// Arguments for `pklot simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to the gate event script (YAML).
    #[arg(long, value_name = "EVENTS_YAML")]
    pub events: PathBuf,

    /// Settle every exit fee through this payment provider.
    #[arg(long)]
    pub provider: Option<String>,
}

/// A gate event script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventScript {
    /// Wall-clock time of `at_minutes: 0`.
    pub start: Timestamp,
    pub events: Vec<GateEvent>,
}

/// One event at a gate, timed relative to the script start.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GateEvent {
    Admit {
        at_minutes: i64,
        vehicle: VehicleId,
        category: VehicleCategory,
    },
    Release {
        at_minutes: i64,
        vehicle: VehicleId,
    },
}

impl GateEvent {
    pub fn at_minutes(&self) -> i64 {
        match self {
            Self::Admit { at_minutes, .. } | Self::Release { at_minutes, .. } => *at_minutes,
        }
    }

    pub fn vehicle(&self) -> &VehicleId {
        match self {
            Self::Admit { vehicle, .. } | Self::Release { vehicle, .. } => vehicle,
        }
    }
}

/// What happened at one event, emitted as a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    Admitted {
        at: Timestamp,
        vehicle: VehicleId,
        ticket: TicketId,
        spot: SpotId,
        price: Amount,
    },
    Released {
        at: Timestamp,
        vehicle: VehicleId,
        ticket: TicketId,
        spot: SpotId,
        minutes: i64,
        billed_units: u64,
        amount: Amount,
        currency: Currency,
        #[serde(skip_serializing_if = "Option::is_none")]
        payment: Option<PaymentReceipt>,
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_error: Option<String>,
    },
    Rejected {
        at: Timestamp,
        vehicle: VehicleId,
        error: String,
    },
}

impl EventScript {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let script: Self = serde_yaml::from_str(yaml).context("failed to parse event script")?;
        script.check_order()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event script: {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("invalid event script: {}", path.display()))
    }

    fn check_order(&self) -> Result<()> {
        let mut previous = 0;
        for (index, event) in self.events.iter().enumerate() {
            let at = event.at_minutes();
            if at < 0 {
                bail!("event {index}: at_minutes {at} is negative");
            }
            if at < previous {
                bail!("event {index}: at_minutes {at} precedes the previous event at {previous}");
            }
            previous = at;
        }
        Ok(())
    }
}

/// Replay `script` against a new facility built from `config`.
///
/// With `payments`, every successful release is charged through it; a
/// payment failure is reported on the outcome and does not stop the replay.
pub fn replay(
    config: &FacilityConfig,
    script: &EventScript,
    payments: Option<&PaymentService>,
) -> Result<Vec<EventOutcome>> {
    let facility = ParkingFacility::from_config(config, ManualClock::new(script.start))
        .context("failed to build facility")?;

    let mut outcomes = Vec::with_capacity(script.events.len());
    for event in &script.events {
        let offset = Duration::try_minutes(event.at_minutes())
            .context("event time out of range")?;
        let at = script
            .start
            .checked_add(offset)
            .context("event time out of range")?;
        facility.clock().set(at);
        outcomes.push(apply(&facility, event, payments));
    }

    for occ in facility.occupancy() {
        tracing::info!(
            category = %occ.category,
            total = occ.total,
            occupied = occ.occupied(),
            "replay finished"
        );
    }
    Ok(outcomes)
}

fn apply(
    facility: &ParkingFacility<ManualClock>,
    event: &GateEvent,
    payments: Option<&PaymentService>,
) -> EventOutcome {
    let at = facility.clock().now();
    let rejected = |err: &dyn std::fmt::Display| EventOutcome::Rejected {
        at,
        vehicle: event.vehicle().clone(),
        error: err.to_string(),
    };

    match event {
        GateEvent::Admit {
            vehicle, category, ..
        } => match facility.admit(&Vehicle::new(vehicle.clone(), *category)) {
            Ok(ticket) => EventOutcome::Admitted {
                at,
                vehicle: vehicle.clone(),
                ticket: ticket.id(),
                spot: ticket.spot().id,
                price: ticket.spot().price,
            },
            Err(err) => rejected(&err),
        },
        GateEvent::Release { vehicle, .. } => match facility.release(vehicle) {
            Ok(fee) => {
                let (payment, payment_error) = match payments {
                    Some(service) => match service.settle(&fee, facility.currency()) {
                        Ok(receipt) => (Some(receipt), None),
                        Err(err) => (None, Some(err.to_string())),
                    },
                    None => (None, None),
                };
                EventOutcome::Released {
                    at,
                    vehicle: vehicle.clone(),
                    ticket: fee.ticket.id(),
                    spot: fee.ticket.spot().id,
                    minutes: fee.ticket.duration_secs().unwrap_or(0) / 60,
                    billed_units: fee.billed_units,
                    amount: fee.amount,
                    currency: facility.currency().clone(),
                    payment,
                    payment_error,
                }
            }
            Err(err) => rejected(&err),
        },
    }
}

/// Execute `pklot simulate`.
pub fn run_simulate(args: &SimulateArgs, ctx: &CliContext) -> Result<u8> {
    let events = crate::resolve_path(&args.events, ctx.config_path.as_deref());
    let script = EventScript::load(&events)?;
    let payments = args
        .provider
        .as_deref()
        .map(|name| PaymentService::from_registry(&ctx.providers, name, &ctx.provider_settings()))
        .transpose()
        .context("failed to set up payment provider")?;

    tracing::info!(
        facility = %ctx.config.name,
        events = script.events.len(),
        provider = args.provider.as_deref().unwrap_or("none"),
        "replaying gate events"
    );

    let outcomes = replay(&ctx.config, &script, payments.as_ref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for outcome in &outcomes {
        let line = serde_json::to_string(outcome).context("failed to encode outcome")?;
        writeln!(out, "{line}").context("failed to write output")?;
    }
    Ok(0)
}
