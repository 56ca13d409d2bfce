use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Platform fee rate applied to gross winnings.
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.025);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub gross_win: Decimal,
    pub fee: Decimal,
    pub net_win: Decimal,
}

/// Splits gross winnings into the platform fee and the amount credited.
/// Bets are never charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    rate: Decimal,
}

impl FeePolicy {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn apply(&self, gross_win: Decimal) -> FeeBreakdown {
        let fee = gross_win * self.rate;
        FeeBreakdown {
            gross_win,
            fee,
            net_win: gross_win - fee,
        }
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn jackpot_fee() {
        let b = FeePolicy::default().apply(dec!(500));
        assert_eq!(b.fee, dec!(12.5));
        assert_eq!(b.net_win, dec!(487.5));
    }

    #[test]
    fn partial_fee() {
        let b = FeePolicy::default().apply(dec!(4));
        assert_eq!(b.fee, dec!(0.1));
        assert_eq!(b.net_win, dec!(3.9));
    }

    #[test]
    fn zero_win_zero_fee() {
        let b = FeePolicy::default().apply(Decimal::ZERO);
        assert_eq!(b.fee, Decimal::ZERO);
        assert_eq!(b.net_win, Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn fee_plus_net_is_gross(cents in 0i64..10_000_000_000i64) {
            let gross = Decimal::new(cents, 2);
            let b = FeePolicy::default().apply(gross);
            prop_assert_eq!(b.fee + b.net_win, gross);
            prop_assert_eq!(b.fee, gross * dec!(0.025));
            prop_assert!(b.fee >= Decimal::ZERO);
            prop_assert!(b.net_win <= gross);
        }
    }
}
