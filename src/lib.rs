//! dense-dict: an open-addressing key/value dictionary over a dense,
//! hand-rolled growable vector.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small dictionary whose storage and indexing are both built
//!   here, so each layer can be reasoned about on its own.
//! - Layers:
//!   - Vector<T>: owned contiguous buffer with `(cap + 1) * 2` growth and an
//!     O(1) `swap_remove`.
//!   - BucketTable: power-of-two array of `{hash, index}` buckets probed
//!     linearly; the index word doubles as empty/tombstone/occupied state.
//!   - Dictionary<K, V, H>: keeps entries dense in a `Vector` and indexes
//!     them through the bucket table.
//!
//! Constraints
//! - Keys are plain old data (`bytemuck::NoUninit`); equality and hashing
//!   both work on the key's bytes.
//! - One mutator at a time: every structural change takes `&mut self`, so
//!   references from `get`/indexing cannot outlive a push, put or delete.
//! - No ordering guarantees: deletes reorder the entry store.
//!
//! Deletion and index repair
//! - Removing an entry swap-removes it from the entry `Vector`. Before the
//!   move, the bucket of the last entry is retargeted to the hole, found
//!   again by re-hashing that entry's key. The removed entry's bucket
//!   becomes a tombstone.
//!
//! Load factor and rehashing
//! - The table grows (doubles) once occupied plus tombstoned buckets reach
//!   3/4 of its capacity. Rebuilding reuses each bucket's stored hash,
//!   never calls the hasher, and discards tombstones. Because tombstones
//!   count, insert/delete churn can grow the table without net growth in
//!   the number of entries.
//!
//! Hashing
//! - `KeyHasher` is the strategy seam. The default `LaneHash` ignores the
//!   per-dictionary 128-bit `Seed`; custom hashers receive it.
//!
//! Failure model
//! - Allocation failure aborts after logging; `try_*` vector methods
//!   surface it as `AllocError` instead.
//! - Contract violations (index past `len`, `swap_remove` on an empty
//!   vector, zero initial capacity) panic.
//! - Absence is a normal `Option`/`bool` result.

mod bucket_table;
pub mod config;
pub mod dictionary;
mod dictionary_proptest;
pub mod error;
pub mod hashing;
pub mod vector;

// Public surface
pub use bucket_table::{Bucket, BucketState};
pub use config::DictConfig;
pub use dictionary::Dictionary;
pub use error::{AllocError, ConfigError};
pub use hashing::{HashFn, KeyHasher, LaneHash, Seed};
pub use vector::Vector;
