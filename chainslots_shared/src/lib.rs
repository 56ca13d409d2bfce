use chainslots_core::{
    Game, Outcome, SessionTotals, SpinSettlement, Symbol, SymbolSource, Transaction,
    TransactionKind, Wallet, WalletState,
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decimal places shown to players. Internal amounts keep full precision.
pub const DISPLAY_DP: u32 = 2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WalletView {
    pub connected: bool,
    pub address: String,
    pub short_address: String,
    pub balance: Decimal,
    pub network: String,
    pub state: WalletState,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransactionView {
    pub id: Uuid,
    pub seq: u64,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub ts: DateTime<Utc>,
    pub reference: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TotalsView {
    pub total_wagered: Decimal,
    pub total_won: Decimal,
    pub total_fees: Decimal,
    /// Winnings minus stakes, before fees.
    pub net_profit: Decimal,
    /// Winnings net of fees minus stakes; equals the change in balance.
    pub balance_change: Decimal,
    pub spins: u64,
    pub wins: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinView {
    pub reels: Vec<u8>, // indices of symbols
    pub glyphs: String,
    pub outcome: Outcome,
    pub bet: Decimal,
    pub gross_win: Decimal,
    pub fee: Decimal,
    pub net_win: Decimal,
    pub balance_after: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub wallet: WalletView,
    pub totals: TotalsView,
    pub fee_rate: Decimal,
    pub transactions: Vec<TransactionView>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ViewError {
    #[error("reel index {0} is outside the symbol alphabet")]
    UnknownSymbol(u8),
    #[error("expected 3 reels, got {0}")]
    ReelCount(usize),
}

pub type ViewResult<T> = Result<T, ViewError>;

impl WalletView {
    pub fn new(wallet: &Wallet, state: WalletState) -> Self {
        Self {
            connected: wallet.connected,
            address: wallet.address.clone(),
            short_address: truncate_address(&wallet.address),
            balance: wallet.balance,
            network: wallet.network.clone(),
            state,
        }
    }
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            seq: tx.seq,
            kind: tx.kind,
            amount: tx.amount,
            ts: tx.created_at,
            reference: tx.reference.clone(),
        }
    }
}

impl From<SessionTotals> for TotalsView {
    fn from(t: SessionTotals) -> Self {
        Self {
            total_wagered: t.total_wagered,
            total_won: t.total_won,
            total_fees: t.total_fees,
            net_profit: t.net_profit(),
            balance_change: t.balance_change(),
            spins: t.spins,
            wins: t.wins,
        }
    }
}

impl From<&SpinSettlement> for SpinView {
    fn from(s: &SpinSettlement) -> Self {
        Self {
            reels: s.result.symbols.iter().map(|sym| sym.to_index()).collect(),
            glyphs: s.result.symbols.iter().map(|sym| sym.glyph()).collect(),
            outcome: s.result.outcome,
            bet: s.bet,
            gross_win: s.fee.gross_win,
            fee: s.fee.fee,
            net_win: s.fee.net_win,
            balance_after: s.balance_after,
        }
    }
}

impl SpinView {
    /// Decode the reel indices back into symbols.
    pub fn symbols(&self) -> ViewResult<[Symbol; 3]> {
        if self.reels.len() != 3 {
            return Err(ViewError::ReelCount(self.reels.len()));
        }
        let mut out = [Symbol::Diamond; 3];
        for (slot, &idx) in out.iter_mut().zip(&self.reels) {
            if idx as usize >= Symbol::ALL.len() {
                return Err(ViewError::UnknownSymbol(idx));
            }
            *slot = Symbol::from_index(idx);
        }
        Ok(out)
    }
}

impl SessionSnapshot {
    pub fn capture<S: SymbolSource>(game: &Game<S>) -> Self {
        Self {
            wallet: WalletView::new(game.wallet(), game.state()),
            totals: game.totals().into(),
            fee_rate: game.fees().rate(),
            transactions: game.transactions().map(TransactionView::from).collect(),
        }
    }
}

pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Like [`format_amount`] but always carries a sign.
pub fn format_signed(amount: Decimal) -> String {
    if amount >= Decimal::ZERO {
        format!("+{}", format_amount(amount))
    } else {
        format_amount(amount)
    }
}

pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

pub fn truncate_hash(hash: &str) -> String {
    truncate(hash, 10, 8)
}

pub fn truncate_address(address: &str) -> String {
    truncate(address, 6, 4)
}

fn truncate(s: &str, head: usize, tail: usize) -> String {
    if !s.is_ascii() || s.len() <= head + tail {
        return s.to_string();
    }
    format!("{}...{}", &s[..head], &s[s.len() - tail..])
}
