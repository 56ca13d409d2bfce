use rust_decimal::Decimal;

/// Refusals from the wallet ledger and the game session.
///
/// Every variant is returned before any state is touched, so a failed
/// operation never leaves a partial mutation behind.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    #[error("wallet is not connected")]
    WalletDisconnected,
    #[error("a spin is already in progress")]
    SpinInProgress,
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("no spin is waiting to be revealed")]
    NoSpinPending,
    #[error("bet {amount} exceeds the maximum of {limit}")]
    BetAboveLimit { amount: Decimal, limit: Decimal },
    #[error("crediting {0} would overflow the balance")]
    BalanceOverflow(Decimal),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
