//! # pklot-cli — Parking Facility Command-Line Interface
//!
//! ## Subcommands
//!
//! - `pklot simulate` — replay a gate event script, one JSON line per event.
//! - `pklot quote` — price a hypothetical stay.
//! - `pklot spots` — spot inventory and per-category free counts.
//! - `pklot providers` — registered payment providers and capabilities.
//!
//! ```bash
//! pklot --config garage.yaml simulate --events monday.yaml --provider cash
//! pklot quote --price 20 --minutes 90
//! ```
//!
//! Handlers parse arguments, call into `pklot-facility` / `pklot-payment`
//! and format output. They hold no business logic of their own.

pub mod providers;
pub mod quote;
pub mod simulate;
pub mod spots;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pklot_facility::FacilityConfig;
use pklot_payment::{ProviderRegistry, ProviderSettings};

/// Everything a subcommand handler needs, resolved once in `main`.
#[derive(Debug)]
pub struct CliContext {
    pub config: FacilityConfig,
    /// Where `config` came from; `None` for the demo facility.
    pub config_path: Option<PathBuf>,
    pub providers: ProviderRegistry,
}

impl CliContext {
    /// Load the facility from `config` or fall back to the demo lot.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let facility = match config {
            Some(path) => load_facility_config(path)?,
            None => {
                tracing::debug!("no --config given, using the demo facility");
                FacilityConfig::demo()
            }
        };
        Ok(Self {
            config: facility,
            config_path: config.map(Path::to_path_buf),
            providers: ProviderRegistry::builtin(),
        })
    }

    /// Provider settings derived from the facility: same currency, no limits.
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings::new(self.config.currency.clone())
    }
}

/// Read and parse a facility YAML file.
pub fn load_facility_config(path: &Path) -> Result<FacilityConfig> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read facility config: {}", path.display()))?;
    let config = FacilityConfig::from_yaml(&yaml)
        .with_context(|| format!("invalid facility config: {}", path.display()))?;
    tracing::debug!(path = %path.display(), facility = %config.name, "loaded facility config");
    Ok(config)
}

/// Resolve a path relative to the directory of the config file, if any.
///
/// Absolute paths and paths that exist relative to the working directory
/// are returned unchanged.
pub fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    match base.and_then(Path::parent) {
        Some(dir) if dir.join(path).exists() => dir.join(path),
        _ => path.to_path_buf(),
    }
}
