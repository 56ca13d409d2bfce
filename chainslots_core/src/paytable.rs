use crate::{
    config::{ConfigError, MAX_MULTIPLIER},
    symbols::Symbol,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Multiplier applied when a symbol has no paytable entry.
pub const FALLBACK_MULTIPLIER: Decimal = dec!(2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaytableEntry {
    pub symbol: Symbol,
    pub multiplier: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paytable(pub Vec<PaytableEntry>);

impl Paytable {
    pub fn classic() -> Self {
        Self(vec![
            PaytableEntry {
                symbol: Symbol::Diamond,
                multiplier: dec!(50),
            },
            PaytableEntry {
                symbol: Symbol::Seven,
                multiplier: dec!(25),
            },
            PaytableEntry {
                symbol: Symbol::MoneyBag,
                multiplier: dec!(15),
            },
            PaytableEntry {
                symbol: Symbol::SlotMachine,
                multiplier: dec!(10),
            },
            PaytableEntry {
                symbol: Symbol::Star,
                multiplier: dec!(8),
            },
            PaytableEntry {
                symbol: Symbol::GlowingStar,
                multiplier: dec!(5),
            },
            PaytableEntry {
                symbol: Symbol::BlueDiamond,
                multiplier: dec!(3),
            },
            PaytableEntry {
                symbol: Symbol::Cherry,
                multiplier: dec!(2),
            },
        ])
    }

    pub fn multiplier_for(&self, symbol: Symbol) -> Decimal {
        self.0
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.multiplier)
            .unwrap_or(FALLBACK_MULTIPLIER)
    }

    /// Entries sorted by descending multiplier, for display.
    pub fn ranked(&self) -> Vec<PaytableEntry> {
        let mut entries = self.0.clone();
        entries.sort_by(|a, b| b.multiplier.cmp(&a.multiplier));
        entries
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, entry) in self.0.iter().enumerate() {
            if entry.multiplier <= Decimal::ZERO || entry.multiplier > MAX_MULTIPLIER {
                return Err(ConfigError::NonPositiveMultiplier(entry.symbol));
            }
            if self.0[..i].iter().any(|e| e.symbol == entry.symbol) {
                return Err(ConfigError::DuplicatePaytableEntry(entry.symbol));
            }
        }
        Ok(())
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::classic()
    }
}
