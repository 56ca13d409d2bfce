use crate::{
    config::MAX_BET,
    fee::FeePolicy,
    paytable::Paytable,
    rng::SymbolSource,
    symbols::{Symbol, REELS},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Jackpot,
    PartialMatch,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub symbols: [Symbol; REELS],
    pub outcome: Outcome,
    pub gross_win: Decimal,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.gross_win > Decimal::ZERO
    }
}

/// Turns three drawn symbols and a bet into a classified payout.
#[derive(Debug, Clone)]
pub struct OutcomeResolver {
    paytable: Paytable,
    partial_divisor: Decimal,
}

impl OutcomeResolver {
    pub fn new(paytable: Paytable, partial_divisor: Decimal) -> Self {
        Self {
            paytable,
            partial_divisor,
        }
    }

    pub fn paytable(&self) -> &Paytable {
        &self.paytable
    }

    /// Pure classification; identical inputs always produce identical results.
    ///
    /// Expects a validated paytable and a bet within `(0, MAX_BET]`, which
    /// keeps every payout well inside `Decimal` range.
    pub fn resolve(&self, symbols: [Symbol; REELS], bet: Decimal) -> SpinResult {
        let [a, b, c] = symbols;
        if a == b && b == c {
            return SpinResult {
                symbols,
                outcome: Outcome::Jackpot,
                gross_win: bet * self.paytable.multiplier_for(a),
            };
        }
        // with three slots at most one pair can match once the all-equal case is gone
        let pair = if a == b || a == c {
            Some(a)
        } else if b == c {
            Some(b)
        } else {
            None
        };
        if let Some(sym) = pair {
            let multiplier = self.paytable.multiplier_for(sym) / self.partial_divisor;
            let gross_win = (bet * multiplier).trunc();
            if gross_win > Decimal::ZERO {
                return SpinResult {
                    symbols,
                    outcome: Outcome::PartialMatch,
                    gross_win,
                };
            }
        }
        SpinResult {
            symbols,
            outcome: Outcome::NoMatch,
            gross_win: Decimal::ZERO,
        }
    }

    /// Exact expected net return per unit wagered at `bet`, over all
    /// equiprobable triples. `None` unless `bet` is within `(0, MAX_BET]`.
    pub fn expected_return(&self, bet: Decimal, fees: &FeePolicy) -> Option<Decimal> {
        if bet <= Decimal::ZERO || bet > MAX_BET {
            return None;
        }
        let mut total = Decimal::ZERO;
        for a in Symbol::ALL {
            for b in Symbol::ALL {
                for c in Symbol::ALL {
                    let result = self.resolve([a, b, c], bet);
                    total += fees.apply(result.gross_win).net_win;
                }
            }
        }
        Some(total / (bet * dec!(512)))
    }
}

/// Draw three reels from `source` and resolve them.
pub fn spin_once<S: SymbolSource + ?Sized>(
    source: &mut S,
    resolver: &OutcomeResolver,
    bet: Decimal,
) -> SpinResult {
    let symbols = source.draw_reels();
    resolver.resolve(symbols, bet)
}
