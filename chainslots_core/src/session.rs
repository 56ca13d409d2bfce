use crate::{
    config::{ConfigError, GameConfig},
    engine::{OutcomeResolver, SpinResult},
    error::{LedgerError, LedgerResult},
    fee::{FeeBreakdown, FeePolicy},
    ledger::{Transaction, TransactionKind, TransactionLog},
    paytable::Paytable,
    reveal::RevealSchedule,
    rng::SymbolSource,
    stats::{SessionAggregator, SessionTotals},
    wallet::{Wallet, WalletLedger, WalletState},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything that lives exactly as long as one wallet connection.
#[derive(Debug, Clone)]
pub struct Session {
    log: TransactionLog,
    totals: SessionAggregator,
    pending_bet: Option<Decimal>,
    started_at: DateTime<Utc>,
}

impl Session {
    fn new(log_capacity: usize) -> Self {
        Self {
            log: TransactionLog::new(log_capacity),
            totals: SessionAggregator::new(),
            pending_bet: None,
            started_at: Utc::now(),
        }
    }

    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals.totals()
    }

    pub fn pending_bet(&self) -> Option<Decimal> {
        self.pending_bet
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinSettlement {
    pub bet: Decimal,
    pub result: SpinResult,
    pub fee: FeeBreakdown,
    pub balance_after: Decimal,
    pub reveal: RevealSchedule,
}

/// A single-wallet slot machine.
///
/// All mutation goes through `&mut self`, so one `Game` is one serialized
/// actor: a bet, its reveal and any disconnect can never interleave.
#[derive(Debug)]
pub struct Game<S> {
    source: S,
    config: GameConfig,
    resolver: OutcomeResolver,
    fees: FeePolicy,
    ledger: WalletLedger,
    session: Option<Session>,
}

impl<S: SymbolSource> Game<S> {
    pub fn new(source: S, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            resolver: OutcomeResolver::new(config.paytable.clone(), config.partial_divisor),
            fees: FeePolicy::new(config.fee_rate),
            config,
            ledger: WalletLedger::new(),
            session: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn paytable(&self) -> &Paytable {
        self.resolver.paytable()
    }

    pub fn resolver(&self) -> &OutcomeResolver {
        &self.resolver
    }

    pub fn fees(&self) -> &FeePolicy {
        &self.fees
    }

    pub fn wallet(&self) -> &Wallet {
        self.ledger.wallet()
    }

    pub fn state(&self) -> WalletState {
        self.ledger.state()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Newest first. Empty while disconnected.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.session.iter().flat_map(|s| s.log.iter())
    }

    pub fn totals(&self) -> SessionTotals {
        self.session.as_ref().map(Session::totals).unwrap_or_default()
    }

    pub fn pending_bet(&self) -> Option<Decimal> {
        self.session.as_ref().and_then(Session::pending_bet)
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.ledger.can_afford(amount)
    }

    /// Start a fresh session with the configured starting balance.
    /// Reconnecting while connected discards the previous session.
    pub fn connect_wallet(&mut self) -> &Wallet {
        if self.ledger.is_connected() {
            self.disconnect_wallet();
        }
        let mut raw = [0u8; 20];
        self.source.fill_bytes(&mut raw);
        let address = format!("0x{}", hex::encode(raw));
        self.ledger
            .connect(address, self.config.starting_balance, &self.config.network);
        self.session = Some(Session::new(self.config.log_capacity));
        info!(address = %self.ledger.wallet().address, balance = %self.ledger.balance(), "wallet connected");
        self.ledger.wallet()
    }

    /// Tear down the session. Returns `true` if a pending spin was cancelled.
    pub fn disconnect_wallet(&mut self) -> bool {
        let cancelled = self
            .session
            .take()
            .and_then(|s| s.pending_bet)
            .inspect(|bet| warn!(%bet, "disconnect cancelled pending spin"))
            .is_some();
        if self.ledger.is_connected() {
            info!(address = %self.ledger.wallet().address, "wallet disconnected");
        }
        self.ledger.disconnect();
        cancelled
    }

    /// Debit the stake and record the bet. The reels are drawn later by
    /// [`Game::reveal_reels_and_resolve`].
    pub fn place_bet(&mut self, amount: Decimal) -> LedgerResult<Transaction> {
        if let Err(err) = self.ledger.check_debit(amount) {
            warn!(%amount, %err, "bet rejected");
            return Err(err);
        }
        let Some(session) = self.session.as_mut() else {
            return Err(LedgerError::WalletDisconnected);
        };
        self.ledger.begin_spin(amount)?;
        let tx = session
            .log
            .append(TransactionKind::Bet, amount, entropy(&mut self.source));
        session.totals.on_transaction(&tx);
        session.pending_bet = Some(amount);
        Ok(tx)
    }

    /// Draw all three reels, then settle the pending bet in one step.
    pub fn reveal_reels_and_resolve(&mut self) -> LedgerResult<SpinSettlement> {
        let Some(session) = self.session.as_mut() else {
            return Err(LedgerError::WalletDisconnected);
        };
        let Some(bet) = session.pending_bet else {
            return Err(LedgerError::NoSpinPending);
        };

        let symbols = self.source.draw_reels();
        let result = self.resolver.resolve(symbols, bet);
        let fee = self.fees.apply(result.gross_win);

        if result.is_win() {
            self.ledger.credit(fee.net_win)?;
            let win = session
                .log
                .append(TransactionKind::Win, fee.gross_win, entropy(&mut self.source));
            session.totals.on_transaction(&win);
            if fee.fee > Decimal::ZERO {
                let charged = session
                    .log
                    .append(TransactionKind::Fee, fee.fee, entropy(&mut self.source));
                session.totals.on_transaction(&charged);
            }
        }
        self.ledger.finish_spin()?;
        session.pending_bet = None;

        let balance_after = self.ledger.balance();
        info!(
            symbols = %format!("{}{}{}", symbols[0], symbols[1], symbols[2]),
            outcome = ?result.outcome,
            %bet,
            gross = %fee.gross_win,
            fee = %fee.fee,
            balance = %balance_after,
            "spin settled"
        );
        Ok(SpinSettlement {
            bet,
            reveal: RevealSchedule::for_symbols(symbols, &self.config.reveal),
            result,
            fee,
            balance_after,
        })
    }

    /// Bet and settle in one call.
    pub fn spin(&mut self, amount: Decimal) -> LedgerResult<SpinSettlement> {
        self.place_bet(amount)?;
        self.reveal_reels_and_resolve()
    }
}

fn entropy<S: SymbolSource>(source: &mut S) -> [u8; 48] {
    let mut bytes = [0u8; 48];
    source.fill_bytes(&mut bytes);
    bytes
}
