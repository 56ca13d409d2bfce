use crate::symbols::{Symbol, REELS, SYMBOL_COUNT};
use hmac::{Hmac, Mac};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use sha2::Sha256;
use std::collections::VecDeque;

// Provably-fair byte stream:
// HMAC-SHA256(key = server_seed, msg = "client_seed:nonce:block") -> 32 bytes per block

pub type HmacSha256 = Hmac<Sha256>;

pub fn derive_hash_hex(input: &[u8]) -> String {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Anything the reels can be drawn from.
///
/// Identifier generation (wallet addresses, transaction ids and references)
/// pulls bytes from the same source so a seeded session is fully replayable.
pub trait SymbolSource {
    fn draw(&mut self) -> Symbol;

    fn fill_bytes(&mut self, dest: &mut [u8]);

    fn draw_reels(&mut self) -> [Symbol; REELS] {
        [self.draw(), self.draw(), self.draw()]
    }
}

/// Uniform draw over the alphabet from an injected RNG.
#[derive(Debug, Clone)]
pub struct RandomSymbolSource<R> {
    rng: R,
}

impl<R: RngCore> RandomSymbolSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl RandomSymbolSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: RngCore> SymbolSource for RandomSymbolSource<R> {
    fn draw(&mut self) -> Symbol {
        Symbol::from_index(self.rng.gen_range(0..SYMBOL_COUNT as u8))
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest);
    }
}

/// Replays a fixed sequence of symbols, then repeats the last one.
/// Identifier bytes come from a seeded RNG.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: VecDeque<Symbol>,
    last: Symbol,
    bytes: StdRng,
}

impl ScriptedSource {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            script: symbols.into_iter().collect(),
            last: Symbol::Cherry,
            bytes: StdRng::seed_from_u64(0),
        }
    }

    /// Queue one more spin's worth of symbols.
    pub fn push_reels(&mut self, reels: [Symbol; REELS]) {
        self.script.extend(reels);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SymbolSource for ScriptedSource {
    fn draw(&mut self) -> Symbol {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bytes.fill_bytes(dest);
    }
}

#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    pub server_seed: String, // secret
    pub client_seed: String,
    pub nonce: u64,
    block: u64,
    buffer: [u8; 32],
    cursor: usize,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            block: 0,
            buffer: [0u8; 32],
            cursor: 32,
        }
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self, block: u64) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        let msg = format!("{}:{}:{}", self.client_seed, self.nonce, block);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    fn refill(&mut self) {
        self.buffer = self.hmac_bytes(self.block);
        self.block += 1;
        self.cursor = 0;
    }
}

impl RngCore for ProvablyFairRng {
    fn next_u32(&mut self) -> u32 {
        let mut b = [0u8; 4];
        self.fill_bytes(&mut b);
        u32::from_be_bytes(b)
    }

    fn next_u64(&mut self) -> u64 {
        let mut b = [0u8; 8];
        self.fill_bytes(&mut b);
        u64::from_be_bytes(b)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut written = 0;
        while written < dest.len() {
            if self.cursor == self.buffer.len() {
                self.refill();
            }
            let n = (dest.len() - written).min(self.buffer.len() - self.cursor);
            dest[written..written + n].copy_from_slice(&self.buffer[self.cursor..self.cursor + n]);
            self.cursor += n;
            written += n;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
