//! The manifest document model.
//!
//! A manifest is an ordered JSON object. Every edit performed by this crate
//! keeps the relative order of untouched keys, so a rewritten manifest diffs
//! cleanly against its source. Ordering relies on the `preserve_order`
//! feature of `serde_json`.
//!
//! - [`Manifest`]: nested section access and order-preserving removal
//! - [`upsert`]: insert a key directly after an anchor key, or merge into it
//! - [`prune`] / [`prune_key`]: drop self-references and collapse empty containers

mod document;
mod io;
mod prune;
mod upsert;

pub use document::*;
pub use io::ManifestError;
pub(crate) use io::write_atomic;
pub use prune::{prune, prune_key};
pub use upsert::{UpsertOutcome, upsert};
