use crate::{paytable::Paytable, symbols::Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Upper bounds keep every product the engine forms (bet x multiplier,
// gross x fee rate, balance + credit) far inside Decimal's range.
pub const MAX_STARTING_BALANCE: Decimal = dec!(1_000_000_000_000_000);
pub const MAX_BET: Decimal = dec!(1_000_000_000_000_000);
pub const MAX_MULTIPLIER: Decimal = dec!(1_000_000);
pub const MAX_LOG_CAPACITY: usize = 10_000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("starting balance must be within (0, {MAX_STARTING_BALANCE}], got {0}")]
    StartingBalance(Decimal),
    #[error("fee rate must be within [0, 1), got {0}")]
    FeeRate(Decimal),
    #[error("log capacity must be within [1, {MAX_LOG_CAPACITY}]")]
    LogCapacity,
    #[error("partial divisor must be at least 1, got {0}")]
    PartialDivisor(Decimal),
    #[error("multiplier for {0:?} must be within (0, {MAX_MULTIPLIER}]")]
    NonPositiveMultiplier(Symbol),
    #[error("paytable lists {0:?} more than once")]
    DuplicatePaytableEntry(Symbol),
}

/// Pacing of the staged reel reveal, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    pub reel_stops_ms: [u64; 3],
    pub settle_ms: u64,
}

impl RevealTiming {
    pub fn reel_stop(&self, reel: usize) -> Duration {
        Duration::from_millis(self.reel_stops_ms[reel])
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            reel_stops_ms: [1000, 1500, 2000],
            settle_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_balance: Decimal,
    /// Fraction of gross winnings kept by the platform.
    pub fee_rate: Decimal,
    pub log_capacity: usize,
    /// Two-of-a-kind pays the symbol multiplier divided by this.
    pub partial_divisor: Decimal,
    pub network: String,
    pub paytable: Paytable,
    pub reveal: RevealTiming,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: dec!(1000),
            fee_rate: dec!(0.025),
            log_capacity: 50,
            partial_divisor: dec!(5),
            network: "Ethereum Mainnet".to_string(),
            paytable: Paytable::classic(),
            reveal: RevealTiming::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_balance <= Decimal::ZERO || self.starting_balance > MAX_STARTING_BALANCE {
            return Err(ConfigError::StartingBalance(self.starting_balance));
        }
        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err(ConfigError::FeeRate(self.fee_rate));
        }
        if self.log_capacity == 0 || self.log_capacity > MAX_LOG_CAPACITY {
            return Err(ConfigError::LogCapacity);
        }
        if self.partial_divisor < Decimal::ONE {
            return Err(ConfigError::PartialDivisor(self.partial_divisor));
        }
        self.paytable.validate()
    }
}
