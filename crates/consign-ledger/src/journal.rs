//! Append-only event journal with a SHA-256 hash chain.
//!
//! Every entry commits to the digest of the entry before it:
//! ```text
//! digest_n = SHA-256("consign:journal:v1:" || digest_{n-1} || n || call_id
//!                    || rfc3339(recorded_at) || json(event))
//! ```
//! so editing any field of an entry, timestamp included, or dropping an
//! entry breaks every digest after it.

use chrono::{DateTime, SecondsFormat, Utc};
use consign_types::{CallId, Result, ShopError, ShopEvent};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest that precedes the first entry.
pub const GENESIS_DIGEST: [u8; 32] = [0u8; 32];

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 0.
    pub sequence: u64,
    /// The public call that produced this event.
    pub call_id: CallId,
    pub event: ShopEvent,
    pub recorded_at: DateTime<Utc>,
    /// Digest of the previous entry.
    pub prev_digest: [u8; 32],
    /// Digest of this entry.
    pub digest: [u8; 32],
}

impl JournalEntry {
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

fn compute_digest(
    prev: &[u8; 32],
    sequence: u64,
    call_id: CallId,
    recorded_at: &DateTime<Utc>,
    event: &ShopEvent,
) -> Result<[u8; 32]> {
    let payload = serde_json::to_vec(event)?;
    let mut hasher = Sha256::new();
    hasher.update(b"consign:journal:v1:");
    hasher.update(prev);
    hasher.update(sequence.to_le_bytes());
    hasher.update(call_id.0.as_bytes());
    hasher.update(recorded_at.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
    hasher.update(&payload);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    Ok(digest)
}

/// Append-only log of [`ShopEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventJournal {
    entries: Vec<JournalEntry>,
}

impl EventJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest of the newest entry, or [`GENESIS_DIGEST`] when empty.
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.entries.last().map_or(GENESIS_DIGEST, |e| e.digest)
    }

    /// Append an event.
    pub fn record(&mut self, call_id: CallId, event: ShopEvent) -> Result<&JournalEntry> {
        let prev_digest = self.head();
        let sequence = self.entries.len() as u64;
        let recorded_at = Utc::now();
        let digest = compute_digest(&prev_digest, sequence, call_id, &recorded_at, &event)?;
        tracing::debug!(sequence, %call_id, event = %event, digest = %hex::encode(&digest[..8]), "journal entry");
        self.entries.push(JournalEntry {
            sequence,
            call_id,
            event,
            recorded_at,
            prev_digest,
            digest,
        });
        self.entries
            .last()
            .ok_or_else(|| ShopError::Internal("journal append lost".into()))
    }

    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry past the first `len`, undoing a failed call.
    pub fn rollback_to(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Events recorded by one call, in order.
    pub fn events_of(&self, call_id: CallId) -> impl Iterator<Item = &ShopEvent> {
        self.entries
            .iter()
            .filter(move |e| e.call_id == call_id)
            .map(|e| &e.event)
    }

    /// Recompute every digest and check the chain links.
    ///
    /// # Errors
    /// `JournalCorrupted` naming the first entry that does not verify.
    pub fn verify_chain(&self) -> Result<()> {
        let mut prev = GENESIS_DIGEST;
        for (i, entry) in self.entries.iter().enumerate() {
            let expected = compute_digest(
                &prev,
                i as u64,
                entry.call_id,
                &entry.recorded_at,
                &entry.event,
            )?;
            if entry.sequence != i as u64 || entry.prev_digest != prev || entry.digest != expected {
                return Err(ShopError::JournalCorrupted(i as u64));
            }
            prev = entry.digest;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consign_types::{Address, SlotId};

    fn fee_change(new: u64) -> ShopEvent {
        ShopEvent::FeePercentChanged { old: 4_000, new }
    }

    #[test]
    fn empty_journal_head_is_genesis() {
        let journal = EventJournal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.head(), GENESIS_DIGEST);
        assert!(journal.verify_chain().is_ok());
    }

    #[test]
    fn entries_chain_to_previous_digest() {
        let mut journal = EventJournal::new();
        let call = CallId::new();
        let first = journal.record(call, fee_change(1)).unwrap().clone();
        let second = journal.record(call, fee_change(2)).unwrap().clone();
        assert_eq!(first.sequence, 0);
        assert_eq!(first.prev_digest, GENESIS_DIGEST);
        assert_eq!(second.prev_digest, first.digest);
        assert_eq!(journal.head(), second.digest);
        assert_eq!(second.digest_hex().len(), 64);
        assert!(journal.verify_chain().is_ok());
    }

    #[test]
    fn tampering_is_detected() {
        let mut journal = EventJournal::new();
        let call = CallId::new();
        journal.record(call, fee_change(1)).unwrap();
        journal.record(call, fee_change(2)).unwrap();
        journal.record(call, fee_change(3)).unwrap();

        let mut tampered = journal.clone();
        tampered.entries[1].event = fee_change(99);
        assert_eq!(
            tampered.verify_chain(),
            Err(ShopError::JournalCorrupted(1))
        );

        let mut backdated = journal.clone();
        backdated.entries[0].recorded_at = DateTime::<Utc>::UNIX_EPOCH;
        assert_eq!(
            backdated.verify_chain(),
            Err(ShopError::JournalCorrupted(0))
        );

        let mut dropped = journal.clone();
        dropped.entries.remove(0);
        assert_eq!(dropped.verify_chain(), Err(ShopError::JournalCorrupted(0)));
    }

    #[test]
    fn events_grouped_by_call() {
        let mut journal = EventJournal::new();
        let listing = CallId::new();
        let other = CallId::new();
        for slot in 0..3 {
            journal
                .record(
                    listing,
                    ShopEvent::ItemListed {
                        slot: SlotId(slot),
                        asset_contract: Address::from_low_u64(1),
                        asset_id: consign_types::AssetId(u128::from(slot)),
                        quantity: 1,
                    },
                )
                .unwrap();
        }
        journal.record(other, fee_change(5)).unwrap();
        assert_eq!(journal.events_of(listing).count(), 3);
        assert_eq!(journal.events_of(other).count(), 1);
        assert_eq!(journal.len(), 4);
    }

    #[test]
    fn rollback_keeps_chain_valid() {
        let mut journal = EventJournal::new();
        let call = CallId::new();
        journal.record(call, fee_change(1)).unwrap();
        let head = journal.head();
        let len = journal.len();
        journal.record(CallId::new(), fee_change(2)).unwrap();
        journal.rollback_to(len);
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.head(), head);
        journal.record(call, fee_change(3)).unwrap();
        assert!(journal.verify_chain().is_ok());
    }
}
