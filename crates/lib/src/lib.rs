//! scaffold-lib: project-template generalization
//!
//! A project created from a template starts with the template's own manifest.
//! This crate turns that manifest into a generic consumer manifest and keeps
//! the template package well-behaved as a dev dependency afterwards:
//! - `manifest`: order-preserving manifest document, upsert and pruning
//! - `generalize`: the one-time transform
//! - `invocation`: choosing between immediate and deferred installation
//! - `action` / `install`: scheduled follow-up installs
//! - `pool`: per-resolution cleanup of the template package

pub mod action;
pub mod config;
pub mod consts;
pub mod generalize;
pub mod install;
pub mod invocation;
pub mod manifest;
pub mod pool;
