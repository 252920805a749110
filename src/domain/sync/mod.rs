//! Spreadsheet reconciliation engine.
//!
//! One import pass runs three stages, all pure except the final store write:
//! 1. [`decoder::decode`] turns each raw row into a `PlantCandidate`,
//!    substituting defaults for malformed or empty cells.
//! 2. [`reconciler::reconcile`] classifies candidates as create/update
//!    against a snapshot of the persisted collection and marks everything
//!    the input did not reference for deletion.
//! 3. The store applies the resulting [`SyncPlan`] as one atomic unit
//!    (see `storage::plants`).
//!
//! NOTE: the import has full-replace semantics. A persisted plant whose id
//! does not appear among the input's valid declared ids is DELETED. An empty
//! sheet wipes the collection.

pub mod decoder;
pub mod reconciler;
pub mod row;

pub use decoder::{decode, PlantCandidate, DEFAULT_LOCATION, DEFAULT_NAME};
pub use reconciler::{reconcile, SyncPlan};
pub use row::{Cell, SourceRow};
