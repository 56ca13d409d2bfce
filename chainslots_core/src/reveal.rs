use crate::{
    config::RevealTiming,
    symbols::{Symbol, REELS},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Presentation pacing only. Settlement has already happened by the time a
// schedule exists; replaying it never touches the ledger.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealKind {
    ReelStopped { reel: usize, symbol: Symbol },
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealEvent {
    /// Offset from the start of the spin.
    pub at: Duration,
    pub kind: RevealKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSchedule {
    events: Vec<RevealEvent>,
}

impl RevealSchedule {
    pub fn for_symbols(symbols: [Symbol; REELS], timing: &RevealTiming) -> Self {
        let mut events: Vec<RevealEvent> = symbols
            .iter()
            .enumerate()
            .map(|(reel, &symbol)| RevealEvent {
                at: timing.reel_stop(reel),
                kind: RevealKind::ReelStopped { reel, symbol },
            })
            .collect();
        // stable, so reels sharing a stop time keep reel order
        events.sort_by_key(|e| e.at);
        let last_stop = events.last().map(|e| e.at).unwrap_or_default();
        events.push(RevealEvent {
            at: last_stop + timing.settle(),
            kind: RevealKind::Settled,
        });
        Self { events }
    }

    pub fn events(&self) -> &[RevealEvent] {
        &self.events
    }

    pub fn total(&self) -> Duration {
        self.events.last().map(|e| e.at).unwrap_or_default()
    }

    /// Gaps between consecutive events, for a driver that sleeps between them.
    pub fn delays(&self) -> impl Iterator<Item = (Duration, &RevealEvent)> {
        let mut prev = Duration::ZERO;
        self.events.iter().map(move |e| {
            let gap = e.at.saturating_sub(prev);
            prev = e.at;
            (gap, e)
        })
    }
}
