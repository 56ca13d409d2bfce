pub mod config;
pub mod engine;
pub mod error;
pub mod fee;
pub mod ledger;
pub mod paytable;
pub mod reveal;
pub mod rng;
pub mod session;
pub mod stats;
pub mod symbols;
pub mod wallet;

pub use crate::config::{
    ConfigError, GameConfig, RevealTiming, MAX_BET, MAX_LOG_CAPACITY, MAX_MULTIPLIER,
    MAX_STARTING_BALANCE,
};
pub use crate::engine::{spin_once, Outcome, OutcomeResolver, SpinResult};
pub use crate::error::{LedgerError, LedgerResult};
pub use crate::fee::{FeeBreakdown, FeePolicy, DEFAULT_FEE_RATE};
pub use crate::ledger::{Transaction, TransactionKind, TransactionLog};
pub use crate::paytable::{Paytable, PaytableEntry, FALLBACK_MULTIPLIER};
pub use crate::reveal::{RevealEvent, RevealKind, RevealSchedule};
pub use crate::rng::{derive_hash_hex, ProvablyFairRng, RandomSymbolSource, ScriptedSource, SymbolSource};
pub use crate::session::{Game, Session, SpinSettlement};
pub use crate::stats::{SessionAggregator, SessionTotals};
pub use crate::symbols::{Symbol, REELS, SYMBOL_COUNT};
pub use crate::wallet::{Wallet, WalletLedger, WalletState};

pub use rust_decimal::Decimal;
