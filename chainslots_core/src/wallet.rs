use crate::{
    config::MAX_BET,
    error::{LedgerError, LedgerResult},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletState {
    Disconnected,
    Idle,
    Spinning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub connected: bool,
    pub address: String,
    pub balance: Decimal,
    pub network: String,
}

impl Wallet {
    fn disconnected() -> Self {
        Self {
            connected: false,
            address: String::new(),
            balance: Decimal::ZERO,
            network: String::new(),
        }
    }
}

/// Wallet balance plus the rules that govern mutating it.
///
/// The balance never goes below zero: debits that would overdraw are
/// refused, not clamped. At most one spin may be in flight.
#[derive(Debug, Clone)]
pub struct WalletLedger {
    wallet: Wallet,
    state: WalletState,
}

impl WalletLedger {
    pub fn new() -> Self {
        Self {
            wallet: Wallet::disconnected(),
            state: WalletState::Disconnected,
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn state(&self) -> WalletState {
        self.state
    }

    pub fn balance(&self) -> Decimal {
        self.wallet.balance
    }

    pub fn is_connected(&self) -> bool {
        self.state != WalletState::Disconnected
    }

    pub fn connect(&mut self, address: String, starting_balance: Decimal, network: &str) {
        self.wallet = Wallet {
            connected: true,
            address,
            balance: starting_balance,
            network: network.to_string(),
        };
        self.state = WalletState::Idle;
    }

    pub fn disconnect(&mut self) {
        self.wallet = Wallet::disconnected();
        self.state = WalletState::Disconnected;
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.check_debit(amount).is_ok()
    }

    /// Check that `amount` could be debited right now, without touching state.
    pub fn check_debit(&self, amount: Decimal) -> LedgerResult<()> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if amount > MAX_BET {
            return Err(LedgerError::BetAboveLimit {
                amount,
                limit: MAX_BET,
            });
        }
        match self.state {
            WalletState::Disconnected => Err(LedgerError::WalletDisconnected),
            WalletState::Spinning => Err(LedgerError::SpinInProgress),
            WalletState::Idle if self.wallet.balance < amount => {
                Err(LedgerError::InsufficientFunds {
                    needed: amount,
                    available: self.wallet.balance,
                })
            }
            WalletState::Idle => Ok(()),
        }
    }

    pub fn debit(&mut self, amount: Decimal) -> LedgerResult<Decimal> {
        self.check_debit(amount)?;
        self.wallet.balance -= amount;
        debug!(%amount, balance = %self.wallet.balance, "debited wallet");
        Ok(self.wallet.balance)
    }

    pub fn credit(&mut self, amount: Decimal) -> LedgerResult<Decimal> {
        if self.state == WalletState::Disconnected {
            return Err(LedgerError::WalletDisconnected);
        }
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        self.wallet.balance = self
            .wallet
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(amount))?;
        debug!(%amount, balance = %self.wallet.balance, "credited wallet");
        Ok(self.wallet.balance)
    }

    /// Debit the stake and move Idle -> Spinning in one step.
    pub fn begin_spin(&mut self, bet: Decimal) -> LedgerResult<Decimal> {
        let balance = self.debit(bet)?;
        self.state = WalletState::Spinning;
        Ok(balance)
    }

    /// Spinning -> Idle.
    pub fn finish_spin(&mut self) -> LedgerResult<()> {
        match self.state {
            WalletState::Spinning => {
                self.state = WalletState::Idle;
                Ok(())
            }
            WalletState::Idle => Err(LedgerError::NoSpinPending),
            WalletState::Disconnected => Err(LedgerError::WalletDisconnected),
        }
    }
}

impl Default for WalletLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn connected() -> WalletLedger {
        let mut ledger = WalletLedger::new();
        ledger.connect("0xabc".into(), dec!(1000), "testnet");
        ledger
    }

    #[test]
    fn connect_and_disconnect_reset_wallet() {
        let mut ledger = connected();
        assert_eq!(ledger.state(), WalletState::Idle);
        assert_eq!(ledger.balance(), dec!(1000));
        assert!(ledger.wallet().connected);

        ledger.disconnect();
        assert_eq!(ledger.state(), WalletState::Disconnected);
        assert_eq!(ledger.wallet(), &Wallet::disconnected());
    }

    #[test]
    fn debit_rejects_overdraft_without_mutation() {
        let mut ledger = connected();
        let err = ledger.debit(dec!(1000.01)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                needed: dec!(1000.01),
                available: dec!(1000)
            }
        );
        assert_eq!(ledger.balance(), dec!(1000));
        assert_eq!(ledger.debit(dec!(1000)), Ok(Decimal::ZERO));
    }

    #[test]
    fn disconnected_wallet_refuses_everything() {
        let mut ledger = WalletLedger::new();
        assert!(!ledger.can_afford(dec!(1)));
        assert_eq!(ledger.debit(dec!(1)), Err(LedgerError::WalletDisconnected));
        assert_eq!(ledger.credit(dec!(1)), Err(LedgerError::WalletDisconnected));
        assert_eq!(ledger.balance(), Decimal::ZERO);
    }

    #[test]
    fn one_spin_at_a_time() {
        let mut ledger = connected();
        assert_eq!(ledger.begin_spin(dec!(10)), Ok(dec!(990)));
        assert!(!ledger.can_afford(dec!(1)));
        assert_eq!(ledger.begin_spin(dec!(10)), Err(LedgerError::SpinInProgress));
        assert_eq!(ledger.balance(), dec!(990));

        ledger.credit(dec!(3.9)).unwrap();
        ledger.finish_spin().unwrap();
        assert_eq!(ledger.state(), WalletState::Idle);
        assert_eq!(ledger.balance(), dec!(993.9));
        assert_eq!(ledger.finish_spin(), Err(LedgerError::NoSpinPending));
    }

    #[test]
    fn non_positive_amounts_are_invalid() {
        let mut ledger = connected();
        assert_eq!(ledger.debit(dec!(0)), Err(LedgerError::InvalidAmount(dec!(0))));
        assert_eq!(ledger.debit(dec!(-5)), Err(LedgerError::InvalidAmount(dec!(-5))));
        assert_eq!(ledger.credit(dec!(-5)), Err(LedgerError::InvalidAmount(dec!(-5))));
        assert_eq!(ledger.balance(), dec!(1000));
    }

    #[test]
    fn can_afford_agrees_with_debit() {
        let ledger = connected();
        assert!(ledger.can_afford(dec!(1000)));
        assert!(!ledger.can_afford(dec!(0)));
        assert!(!ledger.can_afford(dec!(-1)));
        assert!(!ledger.can_afford(dec!(1000.01)));
    }

    #[test]
    fn bets_above_limit_and_overflowing_credits_are_refused() {
        let mut ledger = connected();
        let huge = MAX_BET + Decimal::ONE;
        assert_eq!(
            ledger.debit(huge),
            Err(LedgerError::BetAboveLimit {
                amount: huge,
                limit: MAX_BET
            })
        );
        assert!(!ledger.can_afford(huge));

        ledger.credit(Decimal::MAX - dec!(1000)).unwrap();
        assert_eq!(ledger.credit(dec!(1)), Err(LedgerError::BalanceOverflow(dec!(1))));
        assert_eq!(ledger.balance(), Decimal::MAX);
    }
}
