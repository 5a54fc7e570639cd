//! # consign-ledger
//!
//! **State plane**: the bookkeeping the settlement engine reads and mutates.
//! Nothing in this crate talks to an external collaborator.
//!
//! ## Components
//!
//! 1. **InventoryLedger**: append-only table of inventory slots
//! 2. **PriceBook**: per-slot price lists with explicit length markers
//! 3. **AccessControl**: single-owner gate for administrative operations
//! 4. **EventJournal**: hash-chained audit trail of successful mutations
//!
//! Every mutable component can be checkpointed and rolled back. Rollback
//! cost is proportional to what changed since the checkpoint, never to the
//! size of the ledger ([`UndoMap`] for keyed tables, truncation for the
//! journal).

pub mod access;
pub mod inventory;
pub mod journal;
pub mod price_book;
pub mod undo;

pub use access::AccessControl;
pub use inventory::{InventoryLedger, InventoryMark, Listing};
pub use journal::{EventJournal, JournalEntry};
pub use price_book::{PriceBook, PriceList};
pub use undo::{UndoMap, UndoMark};
