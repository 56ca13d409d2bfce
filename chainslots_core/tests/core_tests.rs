use chainslots_core::{
    Decimal, FeePolicy, Game, GameConfig, LedgerError, Outcome, OutcomeResolver, Paytable,
    ProvablyFairRng, RandomSymbolSource, ScriptedSource, Symbol, TransactionKind, WalletState,
};
use proptest::prelude::*;
use rust_decimal_macros::dec;

#[test]
fn rng_repeatable() {
    let mut g1 = Game::new(
        RandomSymbolSource::new(ProvablyFairRng::new("s", "c", 42)),
        GameConfig::default(),
    )
    .unwrap();
    let mut g2 = Game::new(
        RandomSymbolSource::new(ProvablyFairRng::new("s", "c", 42)),
        GameConfig::default(),
    )
    .unwrap();
    assert_eq!(g1.connect_wallet(), g2.connect_wallet());
    for _ in 0..20 {
        let a = g1.spin(dec!(5)).unwrap();
        let b = g2.spin(dec!(5)).unwrap();
        assert_eq!(a.result, b.result);
        assert_eq!(a.balance_after, b.balance_after);
    }
    let refs1: Vec<_> = g1.transactions().map(|t| t.reference.clone()).collect();
    let refs2: Vec<_> = g2.transactions().map(|t| t.reference.clone()).collect();
    assert_eq!(refs1, refs2);
}

#[test]
fn classification_is_exhaustive_and_pure() {
    let resolver = OutcomeResolver::new(Paytable::classic(), dec!(5));
    let bet = dec!(10);
    let (mut jackpots, mut partials, mut misses) = (0, 0, 0);
    for a in Symbol::ALL {
        for b in Symbol::ALL {
            for c in Symbol::ALL {
                let first = resolver.resolve([a, b, c], bet);
                assert_eq!(first, resolver.resolve([a, b, c], bet));
                let distinct = {
                    let mut v = vec![a, b, c];
                    v.sort();
                    v.dedup();
                    v.len()
                };
                match first.outcome {
                    Outcome::Jackpot => {
                        assert_eq!(distinct, 1);
                        jackpots += 1;
                    }
                    Outcome::PartialMatch => {
                        assert_eq!(distinct, 2);
                        assert!(first.gross_win > Decimal::ZERO);
                        partials += 1;
                    }
                    Outcome::NoMatch => {
                        assert!(distinct >= 2);
                        assert_eq!(first.gross_win, Decimal::ZERO);
                        misses += 1;
                    }
                }
            }
        }
    }
    // at bet 10 every pair pays at least floor(10 * 2/5) = 4
    assert_eq!(jackpots, 8);
    assert_eq!(partials, 168);
    assert_eq!(misses, 336);
    assert_eq!(jackpots + partials + misses, 512);
}

#[test]
fn jackpot_partial_and_miss_in_sequence() {
    let mut g = Game::new(
        ScriptedSource::new([
            Symbol::Diamond,
            Symbol::Diamond,
            Symbol::Diamond,
            Symbol::Cherry,
            Symbol::Cherry,
            Symbol::Star,
            Symbol::Diamond,
            Symbol::Star,
            Symbol::Cherry,
        ]),
        GameConfig::default(),
    )
    .unwrap();
    g.connect_wallet();

    let jackpot = g.spin(dec!(10)).unwrap();
    assert_eq!(jackpot.fee.gross_win, dec!(500));
    assert_eq!(jackpot.fee.fee, dec!(12.5));
    assert_eq!(jackpot.fee.net_win, dec!(487.5));

    let partial = g.spin(dec!(10)).unwrap();
    assert_eq!(partial.result.outcome, Outcome::PartialMatch);
    assert_eq!(partial.fee.gross_win, dec!(4));
    assert_eq!(partial.fee.fee, dec!(0.1));
    assert_eq!(partial.fee.net_win, dec!(3.9));

    let before = g.wallet().balance;
    let tx_before = g.transactions().count();
    let miss = g.spin(dec!(10)).unwrap();
    assert_eq!(miss.result.outcome, Outcome::NoMatch);
    assert_eq!(g.wallet().balance, before - dec!(10));
    assert_eq!(g.transactions().count(), tx_before + 1);
    assert_eq!(g.transactions().next().map(|t| t.kind), Some(TransactionKind::Bet));

    assert_eq!(g.wallet().balance, dec!(1000) - dec!(30) + dec!(487.5) + dec!(3.9));

    let totals = g.totals();
    assert_eq!(totals.balance_change(), g.wallet().balance - dec!(1000));
    assert_eq!(totals.net_profit() - totals.balance_change(), totals.total_fees);
}

#[test]
fn log_cap_does_not_affect_totals() {
    // twenty jackpots: 20 bets + 20 wins + 20 fees = 60 entries
    let mut g = Game::new(
        ScriptedSource::new(std::iter::repeat(Symbol::Cherry).take(60)),
        GameConfig::default(),
    )
    .unwrap();
    g.connect_wallet();
    for _ in 0..20 {
        g.spin(dec!(10)).unwrap();
    }
    let session = g.session().unwrap();
    assert_eq!(session.log().appended(), 60);
    assert_eq!(g.transactions().count(), 50);
    let seqs: Vec<u64> = g.transactions().map(|t| t.seq).collect();
    assert_eq!(seqs, (10..60).rev().collect::<Vec<_>>());

    let totals = g.totals();
    assert_eq!(totals.total_wagered, dec!(200));
    assert_eq!(totals.total_won, dec!(400));
    assert_eq!(totals.total_fees, dec!(10));
    assert_eq!(totals.spins, 20);
}

#[test]
fn rejected_bets_leave_state_untouched() {
    let mut g = Game::new(RandomSymbolSource::seeded(3), GameConfig::default()).unwrap();
    assert_eq!(g.place_bet(dec!(10)), Err(LedgerError::WalletDisconnected));

    g.connect_wallet();
    assert_eq!(
        g.place_bet(dec!(1000.5)),
        Err(LedgerError::InsufficientFunds {
            needed: dec!(1000.5),
            available: dec!(1000)
        })
    );
    assert_eq!(g.place_bet(dec!(0)), Err(LedgerError::InvalidAmount(dec!(0))));
    assert_eq!(g.wallet().balance, dec!(1000));
    assert_eq!(g.transactions().count(), 0);
    assert_eq!(g.state(), WalletState::Idle);

    g.place_bet(dec!(10)).unwrap();
    assert_eq!(g.place_bet(dec!(1)), Err(LedgerError::SpinInProgress));
    assert_eq!(g.wallet().balance, dec!(990));
    assert_eq!(g.state(), WalletState::Spinning);
}

#[test]
fn expected_return_matches_long_run() {
    let resolver = OutcomeResolver::new(Paytable::classic(), dec!(5));
    let fees = FeePolicy::default();
    let exact = resolver.expected_return(dec!(10), &fees).unwrap();
    let mut source = RandomSymbolSource::seeded(99);
    let spins = 200_000u32;
    let mut returned = Decimal::ZERO;
    for _ in 0..spins {
        let r = chainslots_core::spin_once(&mut source, &resolver, dec!(10));
        returned += fees.apply(r.gross_win).net_win;
    }
    let observed = returned / (dec!(10) * Decimal::from(spins));
    assert!((observed - exact).abs() < dec!(0.05), "observed {observed} vs exact {exact}");
}

proptest! {
    #[test]
    fn conservation_of_funds(seed in any::<u64>(), bets in prop::collection::vec(1u32..200, 1..40)) {
        let mut g = Game::new(RandomSymbolSource::seeded(seed), GameConfig::default()).unwrap();
        g.connect_wallet();
        let start = g.wallet().balance;
        let mut wagered = Decimal::ZERO;
        let mut net = Decimal::ZERO;
        for bet in bets {
            let bet = Decimal::from(bet);
            match g.spin(bet) {
                Ok(s) => {
                    wagered += s.bet;
                    net += s.fee.net_win;
                    prop_assert_eq!(s.fee.fee + s.fee.net_win, s.fee.gross_win);
                }
                Err(LedgerError::InsufficientFunds { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
            prop_assert!(g.wallet().balance >= Decimal::ZERO);
        }
        prop_assert_eq!(g.wallet().balance, start - wagered + net);
        prop_assert_eq!(g.totals().total_wagered, wagered);
        prop_assert_eq!(g.totals().total_won - g.totals().total_fees, net);
    }
}
