//! Version numbering, snapshot storage and attachment reachability
//!
//! - `VersionSequencer`: next version number under the write lock, with
//!   bounded retry when an insert collides
//! - `VersionStore`: immutable snapshots of the in-transaction article row
//! - `AttachmentLedger`: whether a filename is still referenced by history
//!
//! # Write path
//!
//! ```text
//! WriteTxn ──► mutate article row ──► sequencer.next ──► store.create_version
//!                                         ▲                    │
//!                                         └── UniqueViolation ─┘ (max 3 attempts)
//! ```

mod ledger;
mod sequencer;
mod version_store;

pub use ledger::{referenced_outside, AttachmentLedger};
pub use sequencer::{VersionSequencer, MAX_VERSION_ATTEMPTS};
pub use version_store::VersionStore;
