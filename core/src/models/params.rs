//! Module parameters and fee amounts

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::validation;

/// Default fee denomination
pub const DEFAULT_FEE_DENOM: &str = "aepix";

/// Default minimum name length
pub const DEFAULT_MIN_NAME_LENGTH: u32 = 1;

/// Default maximum name length
pub const DEFAULT_MAX_NAME_LENGTH: u32 = 64;

/// Governance-controlled registry parameters, stored in state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Denomination fees are charged in
    pub fee_denom: String,

    /// Shortest registrable name
    pub min_name_length: u32,

    /// Longest registrable name
    pub max_name_length: u32,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            fee_denom: DEFAULT_FEE_DENOM.to_string(),
            min_name_length: DEFAULT_MIN_NAME_LENGTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Params{{FeeDenom: {}, MinNameLength: {}, MaxNameLength: {}}}",
            self.fee_denom, self.min_name_length, self.max_name_length
        )
    }
}

impl Params {
    /// Basic validation of the parameter set
    pub fn validate(&self) -> Result<()> {
        validation::validate_denom(&self.fee_denom)
            .map_err(|e| RegistryError::InvalidParams(format!("invalid fee denom: {e}")))?;
        if self.min_name_length == 0 {
            return Err(RegistryError::InvalidParams(
                "min name length must be greater than 0".to_string(),
            ));
        }
        if self.max_name_length == 0 {
            return Err(RegistryError::InvalidParams(
                "max name length must be greater than 0".to_string(),
            ));
        }
        if self.min_name_length > self.max_name_length {
            return Err(RegistryError::InvalidParams(format!(
                "min name length ({}) must not exceed max name length ({})",
                self.min_name_length, self.max_name_length
            )));
        }
        Ok(())
    }
}

/// An amount of a single denomination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination
    pub denom: String,

    /// Amount in base units
    pub amount: u128,
}

impl Coin {
    /// Create a coin
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Coin {
            denom: denom.into(),
            amount,
        }
    }

    /// Whether the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
