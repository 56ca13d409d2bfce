use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Bet,
    Win,
    Fee,
}

/// One immutable ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Position in the session's total order; strictly increasing.
    pub seq: u64,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    /// `0x` followed by 64 hex chars, for display only.
    pub reference: String,
}

/// Append-only history, newest first, holding at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct TransactionLog {
    entries: VecDeque<Transaction>,
    capacity: usize,
    next_seq: u64,
}

impl TransactionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            next_seq: 0,
        }
    }

    /// Record an event. `entropy` supplies the id and reference bytes.
    pub fn append(&mut self, kind: TransactionKind, amount: Decimal, entropy: [u8; 48]) -> Transaction {
        let mut id_bytes = [0u8; 16];
        id_bytes.copy_from_slice(&entropy[..16]);
        let tx = Transaction {
            id: uuid::Builder::from_random_bytes(id_bytes).into_uuid(),
            seq: self.next_seq,
            kind,
            amount,
            created_at: Utc::now(),
            reference: format!("0x{}", hex::encode(&entropy[16..])),
        };
        self.next_seq += 1;
        self.entries.push_front(tx.clone());
        self.entries.truncate(self.capacity);
        debug!(seq = tx.seq, kind = ?tx.kind, amount = %tx.amount, "appended transaction");
        tx
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Transaction> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of entries ever appended, including evicted ones.
    pub fn appended(&self) -> u64 {
        self.next_seq
    }
}
