use anyhow::Context;
use chainslots_core::{
    Decimal, FeePolicy, Game, GameConfig, OutcomeResolver, ProvablyFairRng, RandomSymbolSource,
    SymbolSource, TransactionKind, MAX_BET,
};
use chainslots_shared::{format_amount, format_percent, format_signed, truncate_hash, SessionSnapshot};
use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod play;

#[derive(Parser)]
#[command(name = "chainslots", about = "Simulated three-reel slot machine with a local wallet ledger")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    game: GameArgs,
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct GameArgs {
    /// JSON file with game configuration
    #[arg(long, global = true, env = "CHAINSLOTS_CONFIG")]
    config: Option<PathBuf>,
    /// Override the balance a freshly connected wallet starts with
    #[arg(long, global = true)]
    starting_balance: Option<Decimal>,
    /// Override the platform fee rate, e.g. 0.025
    #[arg(long, global = true)]
    fee_rate: Option<Decimal>,
    /// Server seed; when set, every draw is replayable from the seeds
    #[arg(long, global = true, env = "CHAINSLOTS_SERVER_SEED")]
    server_seed: Option<String>,
    #[arg(long, global = true, default_value = "chainslots")]
    client_seed: String,
    #[arg(long, global = true, default_value_t = 0)]
    nonce: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session reading commands from stdin
    Play {
        /// Sleep through the reel reveal instead of printing it at once
        #[arg(long)]
        pace: bool,
    },
    /// Connect, spin a fixed bet repeatedly and print the session summary
    Autoplay {
        #[arg(long, default_value = "10")]
        bet: Decimal,
        #[arg(long, default_value_t = 100)]
        spins: u32,
        /// Print the final session snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Export the transaction log to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Estimate return-to-player by simulation and compare with the exact value
    Simulate {
        #[arg(long, default_value = "10")]
        bet: Decimal,
        #[arg(long, default_value_t = 100_000)]
        spins: u64,
    },
    /// Show the paytable
    Paytable {
        #[arg(long, default_value = "10")]
        bet: Decimal,
    },
}

pub(crate) type CliGame = Game<RandomSymbolSource<Box<dyn RngCore + Send>>>;

impl GameArgs {
    fn load_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => GameConfig::default(),
        };
        if let Some(balance) = self.starting_balance {
            config.starting_balance = balance;
        }
        if let Some(rate) = self.fee_rate {
            config.fee_rate = rate;
        }
        config.validate()?;
        Ok(config)
    }

    fn rng(&self) -> Box<dyn RngCore + Send> {
        match &self.server_seed {
            Some(seed) => {
                let rng = ProvablyFairRng::new(seed.as_str(), self.client_seed.as_str(), self.nonce);
                info!(server_seed_hash = %rng.server_seed_hash_hex(), client_seed = %self.client_seed, nonce = self.nonce, "provably fair mode");
                Box::new(rng)
            }
            None => Box::new(StdRng::from_entropy()),
        }
    }

    fn game(&self) -> anyhow::Result<CliGame> {
        let config = self.load_config()?;
        Ok(Game::new(RandomSymbolSource::new(self.rng()), config)?)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play { pace } => {
            let game = cli.game.game()?;
            play::run(game, pace).await?;
        }
        Commands::Autoplay {
            bet,
            spins,
            json,
            csv,
        } => {
            let mut game = cli.game.game()?;
            autoplay(&mut game, bet, spins, !json);
            if let Some(path) = csv {
                let rows = export_csv(&game, &path)?;
                info!(rows, path = %path.display(), "exported transaction log");
            }
            if json {
                let snapshot = SessionSnapshot::capture(&game);
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_stats(&game);
            }
        }
        Commands::Simulate { bet, spins } => {
            let config = cli.game.load_config()?;
            simulate(&config, cli.game.rng(), bet, spins)?;
        }
        Commands::Paytable { bet } => {
            let config = cli.game.load_config()?;
            print_paytable(&config, bet)?;
        }
    }

    Ok(())
}

fn autoplay(game: &mut CliGame, bet: Decimal, spins: u32, echo: bool) {
    game.connect_wallet();
    for n in 0..spins {
        if !game.can_afford(bet) {
            info!(spins = n, balance = %game.wallet().balance, %bet, "balance cannot cover bet, stopping");
            break;
        }
        match game.spin(bet) {
            Ok(s) if echo => {
                let [a, b, c] = s.result.symbols;
                println!(
                    "#{:>4} {}{}{} {:<12} gross={:>9} fee={:>7} balance={:>10}",
                    n + 1,
                    a,
                    b,
                    c,
                    format!("{:?}", s.result.outcome),
                    format_amount(s.fee.gross_win),
                    format_amount(s.fee.fee),
                    format_amount(s.balance_after)
                );
            }
            Ok(_) => {}
            Err(err) => {
                println!("spin {} refused: {}", n + 1, err);
                break;
            }
        }
    }
}

pub(crate) fn print_stats<S: SymbolSource>(game: &Game<S>) {
    let t = game.totals();
    println!("Session Stats");
    println!("  Total Wagered   {:>12} TOKENS", format_amount(t.total_wagered));
    println!("  Total Won       {:>12} TOKENS", format_amount(t.total_won));
    println!("  Before Fees     {:>12} TOKENS", format_signed(t.net_profit()));
    println!("  Fees Paid       {:>12} TOKENS", format_amount(t.total_fees));
    println!("  Net Profit/Loss {:>12} TOKENS", format_signed(t.balance_change()));
    println!("  Spins {} / Wins {}", t.spins, t.wins);
    println!("  Platform fee {} on winnings", format_percent(game.fees().rate()));
    println!("  Balance         {:>12} TOKENS", format_amount(game.wallet().balance));
}

pub(crate) fn print_log<S: SymbolSource>(game: &Game<S>, n: usize) {
    for tx in game.transactions().take(n) {
        let sign = match tx.kind {
            TransactionKind::Bet | TransactionKind::Fee => "-",
            TransactionKind::Win => "+",
        };
        println!(
            "#{:>5} {} {:<4} {}{:>10} {}",
            tx.seq,
            tx.created_at.format("%H:%M:%S"),
            format!("{:?}", tx.kind).to_uppercase(),
            sign,
            format_amount(tx.amount),
            truncate_hash(&tx.reference)
        );
    }
}

/// Exact RTP at `bet`, refusing bets the engine would not accept.
fn exact_rtp(resolver: &OutcomeResolver, fees: &FeePolicy, bet: Decimal) -> anyhow::Result<Decimal> {
    resolver
        .expected_return(bet, fees)
        .with_context(|| format!("bet must be greater than 0 and at most {MAX_BET}, got {bet}"))
}

pub(crate) fn print_paytable(config: &GameConfig, bet: Decimal) -> anyhow::Result<()> {
    let resolver = OutcomeResolver::new(config.paytable.clone(), config.partial_divisor);
    let fees = FeePolicy::new(config.fee_rate);
    let rtp = exact_rtp(&resolver, &fees, bet)?;
    println!("PAYOUTS");
    for entry in config.paytable.ranked() {
        let pair = (bet * entry.multiplier / config.partial_divisor).trunc();
        println!(
            "  {s}{s}{s}  x{:<4} pair pays {} at bet {}",
            entry.multiplier,
            format_amount(pair),
            format_amount(bet),
            s = entry.symbol
        );
    }
    println!("RTP at bet {}: {}", format_amount(bet), format_percent(rtp.round_dp(4)));
    Ok(())
}

fn simulate(config: &GameConfig, rng: Box<dyn RngCore + Send>, bet: Decimal, spins: u64) -> anyhow::Result<()> {
    let resolver = OutcomeResolver::new(config.paytable.clone(), config.partial_divisor);
    let fees = FeePolicy::new(config.fee_rate);
    let exact = exact_rtp(&resolver, &fees, bet)?;
    let wagered = bet
        .checked_mul(Decimal::from(spins))
        .context("total wagered overflows; use fewer spins or a smaller bet")?;
    let mut source = RandomSymbolSource::new(rng);
    let mut returned = Decimal::ZERO;
    let mut wins = 0u64;
    for _ in 0..spins {
        let result = chainslots_core::spin_once(&mut source, &resolver, bet);
        if result.is_win() {
            wins += 1;
        }
        returned = returned
            .checked_add(fees.apply(result.gross_win).net_win)
            .context("total returned overflows; use fewer spins or a smaller bet")?;
    }
    let observed = if wagered.is_zero() { Decimal::ZERO } else { returned / wagered };
    println!("spins={} wins={} wagered={} returned={}", spins, wins, format_amount(wagered), format_amount(returned));
    println!(
        "rtp observed={} exact={}",
        format_percent(observed.round_dp(4)),
        format_percent(exact.round_dp(4))
    );
    Ok(())
}

fn export_csv<S: SymbolSource>(game: &Game<S>, path: &Path) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(["seq", "id", "ts", "kind", "amount", "reference"])?;
    let mut rows: Vec<_> = game.transactions().collect();
    rows.reverse();
    for tx in &rows {
        wtr.write_record(&[
            tx.seq.to_string(),
            tx.id.to_string(),
            tx.created_at.to_rfc3339(),
            format!("{:?}", tx.kind),
            tx.amount.to_string(),
            tx.reference.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(rows.len())
}
