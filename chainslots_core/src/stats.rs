use crate::ledger::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running sums over every transaction ever emitted in a session.
///
/// Maintained alongside the transaction log rather than derived from it,
/// since the log evicts old entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub total_wagered: Decimal,
    pub total_won: Decimal,
    pub total_fees: Decimal,
    pub spins: u64,
    pub wins: u64,
}

impl SessionTotals {
    /// Gross winnings minus stakes. Fees are not subtracted.
    pub fn net_profit(&self) -> Decimal {
        self.total_won - self.total_wagered
    }

    /// What the session actually did to the balance: winnings net of fees,
    /// minus stakes.
    pub fn balance_change(&self) -> Decimal {
        self.total_won - self.total_fees - self.total_wagered
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionAggregator {
    totals: SessionTotals,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_transaction(&mut self, tx: &Transaction) {
        let t = &mut self.totals;
        match tx.kind {
            TransactionKind::Bet => {
                t.total_wagered += tx.amount;
                t.spins += 1;
            }
            TransactionKind::Win => {
                t.total_won += tx.amount;
                t.wins += 1;
            }
            TransactionKind::Fee => t.total_fees += tx.amount,
        }
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }

    pub fn net_profit(&self) -> Decimal {
        self.totals.net_profit()
    }
}
