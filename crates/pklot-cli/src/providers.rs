//! # Providers Subcommand
//!
//! Lists every registered payment provider with its capabilities.

use anyhow::{Context, Result};
use pklot_payment::Capability;
use serde::Serialize;

use crate::CliContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRow {
    pub name: String,
    pub capabilities: Vec<Capability>,
}

/// Instantiate each registered provider once to read its capabilities.
pub fn provider_rows(ctx: &CliContext) -> Result<Vec<ProviderRow>> {
    let settings = ctx.provider_settings();
    ctx.providers
        .names()
        .map(|name| {
            let provider = ctx
                .providers
                .create(name, &settings)
                .with_context(|| format!("failed to create provider {name}"))?;
            Ok(ProviderRow {
                name: name.to_string(),
                capabilities: provider.capabilities(),
            })
        })
        .collect()
}

/// Execute `pklot providers`.
pub fn run_providers(ctx: &CliContext) -> Result<u8> {
    for row in provider_rows(ctx)? {
        let caps: Vec<&str> = row.capabilities.iter().map(Capability::as_str).collect();
        println!("{:<14} {}", row.name, caps.join(", "));
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rows() {
        let rows = provider_rows(&CliContext::load(None).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "cash");
        assert_eq!(
            rows[0].capabilities,
            vec![Capability::Charge, Capability::Refund]
        );
        assert_eq!(rows[1].name, "stored_value");
        assert!(rows[1].capabilities.contains(&Capability::GiftCard));
    }
}
