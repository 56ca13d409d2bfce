use crate::{print_log, print_paytable, print_stats, CliGame};
use chainslots_core::{Decimal, RevealKind, SpinSettlement};
use chainslots_shared::{format_amount, truncate_address};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: connect | disconnect | bet <amount> | spin | auto <amount> | stats | log [n] | paytable | help | quit";

#[derive(Debug, PartialEq)]
enum Command {
    Connect,
    Disconnect,
    Bet(Decimal),
    Reveal,
    Auto(Decimal),
    Stats,
    Log(usize),
    Paytable,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();
    let amount = |arg: Option<&str>| -> Result<Decimal, String> {
        arg.ok_or_else(|| "missing amount".to_string())?
            .parse::<Decimal>()
            .map_err(|e| format!("bad amount: {e}"))
    };
    match verb.as_str() {
        "connect" => Ok(Command::Connect),
        "disconnect" => Ok(Command::Disconnect),
        "bet" => amount(arg).map(Command::Bet),
        "spin" | "reveal" => Ok(Command::Reveal),
        "auto" => amount(arg).map(Command::Auto),
        "stats" => Ok(Command::Stats),
        "log" => match arg {
            Some(n) => n.parse().map(Command::Log).map_err(|e| format!("bad count: {e}")),
            None => Ok(Command::Log(10)),
        },
        "paytable" => Ok(Command::Paytable),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}'")),
    }
}

/// Drive one game from stdin until `quit` or EOF.
pub async fn run(mut game: CliGame, pace: bool) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match parse(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        match cmd {
            Command::Connect => {
                let w = game.connect_wallet();
                println!(
                    "connected {} on {} with {} TOKENS",
                    truncate_address(&w.address),
                    w.network,
                    format_amount(w.balance)
                );
            }
            Command::Disconnect => {
                if game.disconnect_wallet() {
                    println!("disconnected; pending spin cancelled");
                } else {
                    println!("disconnected");
                }
            }
            Command::Bet(amount) => match game.place_bet(amount) {
                Ok(_) => println!(
                    "bet {} placed, balance {}; type 'spin' to reveal",
                    format_amount(amount),
                    format_amount(game.wallet().balance)
                ),
                Err(err) => println!("bet refused: {err}"),
            },
            Command::Reveal => match game.reveal_reels_and_resolve() {
                Ok(s) => show(&s, pace).await?,
                Err(err) => println!("{err}"),
            },
            Command::Auto(amount) => match game.spin(amount) {
                Ok(s) => show(&s, pace).await?,
                Err(err) => println!("spin refused: {err}"),
            },
            Command::Stats => print_stats(&game),
            Command::Log(n) => print_log(&game, n),
            Command::Paytable => print_paytable(game.config(), Decimal::from(10))?,
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
    game.disconnect_wallet();
    Ok(())
}

async fn show(s: &SpinSettlement, pace: bool) -> anyhow::Result<()> {
    for (gap, event) in s.reveal.delays() {
        if pace {
            tokio::time::sleep(gap).await;
        }
        match event.kind {
            RevealKind::ReelStopped { reel, symbol } => {
                print!("[{}:{}] ", reel + 1, symbol);
                std::io::stdout().flush()?;
            }
            RevealKind::Settled => println!(),
        }
    }
    if s.result.is_win() {
        println!(
            "WIN! {:?} +{} TOKENS (fee {}, credited {})",
            s.result.outcome,
            format_amount(s.fee.gross_win),
            format_amount(s.fee.fee),
            format_amount(s.fee.net_win)
        );
    } else {
        println!("no win");
    }
    println!("balance {}", format_amount(s.balance_after));
    Ok(())
}
