//! TLD configuration and tiered pricing

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Price rule: names of at most `max_length` characters cost `price`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Inclusive upper bound on name length
    pub max_length: u32,

    /// Price in base units of the fee denom
    pub price: u128,
}

impl PriceTier {
    /// Create a tier
    pub const fn new(max_length: u32, price: u128) -> Self {
        PriceTier { max_length, price }
    }
}

/// Configuration of one top-level label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldConfig {
    /// The label itself
    pub tld: String,

    /// Whether new registrations are accepted
    pub enabled: bool,

    /// Tiers sorted ascending by `max_length`
    pub price_tiers: Vec<PriceTier>,
}

impl TldConfig {
    /// Create a configuration
    pub fn new(tld: impl Into<String>, enabled: bool, price_tiers: Vec<PriceTier>) -> Self {
        TldConfig {
            tld: tld.into(),
            enabled,
            price_tiers,
        }
    }

    /// Check the tier list: non-empty, every bound positive, bounds strictly
    /// ascending
    pub fn validate_tiers(&self) -> Result<()> {
        if self.price_tiers.is_empty() {
            return Err(RegistryError::InvalidPriceTier(format!(
                "TLD {:?} requires at least one price tier",
                self.tld
            )));
        }

        let mut previous: Option<u32> = None;
        for tier in &self.price_tiers {
            if tier.max_length == 0 {
                return Err(RegistryError::InvalidPriceTier(format!(
                    "TLD {:?} has a tier with max_length 0",
                    self.tld
                )));
            }
            if let Some(prev) = previous {
                if tier.max_length <= prev {
                    return Err(RegistryError::InvalidPriceTier(format!(
                        "TLD {:?} tiers must be strictly ascending by max_length ({} after {})",
                        self.tld, tier.max_length, prev
                    )));
                }
            }
            previous = Some(tier.max_length);
        }

        Ok(())
    }
}
