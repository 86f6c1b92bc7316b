//! Registration and transfer

use log::info;

use super::{normalized, require_owned, Registry};
use crate::counters;
use crate::error::{RegistryError, Result};
use crate::events::{attributes, types, Event};
use crate::fees;
use crate::models::{full_name, AccountId, Coin, NameRecord};
use crate::ownership;
use crate::records;
use crate::store::Context;
use crate::treasury::Treasury;
use crate::validation;

impl<T: Treasury> Registry<T> {
    /// Register `name.tld` to `owner`, charging and burning the fee
    ///
    /// Checks run before any write: label syntax, the configured length
    /// bounds, that the TLD exists and is enabled, and that the name is free.
    /// The fee is debited from `owner` and burned before the record is
    /// written; if either step fails the whole transition fails.
    pub fn register(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccountId,
        tld: &str,
        name: &str,
    ) -> Result<NameRecord> {
        let (tld, name) = normalized(tld, name)?;
        validation::validate_name(&name)?;

        let params = records::get_params(ctx)?;
        let length = name.len() as u64;
        if length < params.min_name_length as u64 {
            return Err(RegistryError::InvalidName(format!(
                "name must be at least {} characters",
                params.min_name_length
            )));
        }
        if length > params.max_name_length as u64 {
            return Err(RegistryError::InvalidName(format!(
                "name must be at most {} characters",
                params.max_name_length
            )));
        }
        validation::validate_tld(&tld)?;

        let config = records::get_tld_config(ctx, &tld)?
            .ok_or_else(|| RegistryError::TldNotFound(tld.clone()))?;
        if !config.enabled {
            return Err(RegistryError::TldDisabled(tld));
        }
        if records::has_name_record(ctx, &tld, &name) {
            return Err(RegistryError::NameTaken(full_name(&tld, &name)));
        }

        let fee = Coin::new(params.fee_denom, fees::price_for_length(&config, name.len())?);
        if !fee.is_zero() {
            self.treasury.debit(ctx, owner, &fee)?;
            self.treasury.burn(ctx, &fee)?;
        }

        let record = NameRecord {
            name,
            tld,
            owner: *owner,
            registered_at: ctx.height(),
        };
        ownership::record_registration(ctx, &record)?;
        counters::add_fees_burned(ctx, &record.tld, fee.amount)?;

        ctx.emit(
            Event::new(types::NAME_REGISTERED)
                .attr(attributes::NAME, &record.name)
                .attr(attributes::TLD, &record.tld)
                .attr(attributes::OWNER, owner)
                .attr(attributes::FEE, &fee),
        );
        info!("name registered: {} owner={} fee={}", record.full_name(), owner, fee);
        Ok(record)
    }

    /// Move `name.tld` from `owner` to `new_owner`; no fee is charged
    pub fn transfer(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccountId,
        new_owner: &AccountId,
        tld: &str,
        name: &str,
    ) -> Result<NameRecord> {
        let (tld, name) = normalized(tld, name)?;
        let record = require_owned(ctx, owner, &tld, &name)?;
        if owner == new_owner {
            return Err(RegistryError::InvalidTransfer(format!(
                "{} is already owned by {}",
                record.full_name(),
                owner
            )));
        }

        let updated = ownership::record_transfer(ctx, &record, *new_owner)?;

        ctx.emit(
            Event::new(types::NAME_TRANSFERRED)
                .attr(attributes::NAME, &updated.name)
                .attr(attributes::TLD, &updated.tld)
                .attr(attributes::FROM, owner)
                .attr(attributes::TO, new_owner),
        );
        info!("name transferred: {} from={} to={}", updated.full_name(), owner, new_owner);
        Ok(updated)
    }
}
