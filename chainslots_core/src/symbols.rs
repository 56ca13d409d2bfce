use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of reels in a spin.
pub const REELS: usize = 3;

/// Size of the symbol alphabet.
pub const SYMBOL_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Diamond,
    BlueDiamond,
    Star,
    GlowingStar,
    MoneyBag,
    SlotMachine,
    Seven,
    Cherry,
}

impl Symbol {
    /// The alphabet in draw order.
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Diamond,
        Symbol::BlueDiamond,
        Symbol::Star,
        Symbol::GlowingStar,
        Symbol::MoneyBag,
        Symbol::SlotMachine,
        Symbol::Seven,
        Symbol::Cherry,
    ];

    pub fn from_index(i: u8) -> Self {
        Self::ALL[i as usize % SYMBOL_COUNT]
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::Diamond => 0,
            Symbol::BlueDiamond => 1,
            Symbol::Star => 2,
            Symbol::GlowingStar => 3,
            Symbol::MoneyBag => 4,
            Symbol::SlotMachine => 5,
            Symbol::Seven => 6,
            Symbol::Cherry => 7,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Diamond => "💎",
            Symbol::BlueDiamond => "🔷",
            Symbol::Star => "⭐",
            Symbol::GlowingStar => "🌟",
            Symbol::MoneyBag => "💰",
            Symbol::SlotMachine => "🎰",
            Symbol::Seven => "7️⃣",
            Symbol::Cherry => "🍒",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_and_wraps() {
        for s in Symbol::ALL {
            assert_eq!(Symbol::from_index(s.to_index()), s);
        }
        assert_eq!(Symbol::from_index(8), Symbol::Diamond);
        assert_eq!(Symbol::from_index(15), Symbol::Cherry);
    }

    #[test]
    fn glyphs_are_distinct() {
        let mut glyphs: Vec<_> = Symbol::ALL.iter().map(|s| s.glyph()).collect();
        glyphs.sort();
        glyphs.dedup();
        assert_eq!(glyphs.len(), SYMBOL_COUNT);
    }
}
