//! Adjudication settings.
//!
//! Loaded from JSON by hosts that let a game pick its house rules; every
//! field falls back to the standard rules when absent.

use serde::{Deserialize, Serialize};

/// Rule switches for one adjudication run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjudicationOptions {
    /// Require supports and convoys to match the orders of the units they name.
    pub strict_orders: bool,
    /// A country may never dislodge, or stand off against, its own stationary unit.
    pub forbid_self_dislodgement: bool,
    /// Drop occupied, standoff, and unenterable provinces from retreat options.
    pub restrict_retreats: bool,
}

impl Default for AdjudicationOptions {
    fn default() -> Self {
        AdjudicationOptions {
            strict_orders: true,
            forbid_self_dislodgement: true,
            restrict_retreats: true,
        }
    }
}

impl AdjudicationOptions {
    /// Parses options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
