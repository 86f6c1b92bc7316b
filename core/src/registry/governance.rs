//! Authority-gated management of TLDs and parameters

use log::info;

use super::Registry;
use crate::error::{RegistryError, Result};
use crate::events::{attributes, types, Event};
use crate::models::{AccountId, Params, TldConfig};
use crate::records;
use crate::store::Context;
use crate::treasury::Treasury;
use crate::validation;

impl<T: Treasury> Registry<T> {
    /// Create a new TLD
    pub fn create_tld(&self, ctx: &mut Context<'_>, authority: &AccountId, config: TldConfig) -> Result<()> {
        self.authorize(authority)?;
        let config = checked_tld_config(config)?;
        if records::has_tld_config(ctx, &config.tld) {
            return Err(RegistryError::TldAlreadyExists(config.tld));
        }
        records::set_tld_config(ctx, &config)?;

        ctx.emit(
            Event::new(types::TLD_CREATED)
                .attr(attributes::TLD, &config.tld)
                .attr(attributes::ENABLED, config.enabled)
                .attr(attributes::AUTHORITY, authority),
        );
        info!(
            "TLD {} created with {} price tiers (enabled: {})",
            config.tld,
            config.price_tiers.len(),
            config.enabled
        );
        Ok(())
    }

    /// Replace the configuration of an existing TLD
    pub fn update_tld_config(
        &self,
        ctx: &mut Context<'_>,
        authority: &AccountId,
        config: TldConfig,
    ) -> Result<()> {
        self.authorize(authority)?;
        let config = checked_tld_config(config)?;
        if !records::has_tld_config(ctx, &config.tld) {
            return Err(RegistryError::TldNotFound(config.tld));
        }
        records::set_tld_config(ctx, &config)?;

        ctx.emit(
            Event::new(types::TLD_UPDATED)
                .attr(attributes::TLD, &config.tld)
                .attr(attributes::ENABLED, config.enabled)
                .attr(attributes::AUTHORITY, authority),
        );
        info!("TLD {} updated (enabled: {})", config.tld, config.enabled);
        Ok(())
    }

    /// Replace the module parameters
    pub fn update_params(&self, ctx: &mut Context<'_>, authority: &AccountId, params: Params) -> Result<()> {
        self.authorize(authority)?;
        params.validate()?;
        records::set_params(ctx, &params)?;

        ctx.emit(Event::new(types::PARAMS_UPDATED).attr(attributes::AUTHORITY, authority));
        info!("params updated: {}", params);
        Ok(())
    }
}

/// Normalized and validated copy of `config`
fn checked_tld_config(mut config: TldConfig) -> Result<TldConfig> {
    config.tld = validation::normalize(&config.tld);
    validation::validate_tld(&config.tld)?;
    config.validate_tiers()?;
    Ok(config)
}
