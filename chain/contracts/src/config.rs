//! Deployment parameters for the swap contract

use serde::{Deserialize, Serialize};
use swap_types::ids::Address;

/// Constructor input of [`crate::swap::SwapContract`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Beneficiary address exposed through `dev_fund()`. Never paid by the contract.
    pub dev_fund: Address,
    /// Address the contract operates under. Parties approve this address on
    /// their registries. A fresh one is assigned when absent.
    #[serde(default)]
    pub operator: Option<Address>,
}

impl SwapConfig {
    pub fn new(dev_fund: Address) -> Self {
        Self {
            dev_fund,
            operator: None,
        }
    }

    pub fn with_operator(mut self, operator: Address) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Parse a JSON document such as `{"dev_fund": "<uuid>"}`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
