use chainslots_core::{Decimal, Game, GameConfig, ProvablyFairRng, RandomSymbolSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example end-to-end spin, replayable from the seeds below
    let rng = ProvablyFairRng::new("example-server-seed", "example-client-seed", 1);
    let commitment = rng.server_seed_hash_hex();
    let mut game = Game::new(RandomSymbolSource::new(rng), GameConfig::default())?;
    game.connect_wallet();
    let settlement = game.spin(Decimal::from(10))?;
    let [a, b, c] = settlement.result.symbols;
    println!(
        "server_seed_hash={} reels={}{}{} outcome={:?} gross={} fee={} balance={}",
        commitment,
        a,
        b,
        c,
        settlement.result.outcome,
        settlement.fee.gross_win,
        settlement.fee.fee,
        settlement.balance_after
    );
    Ok(())
}
