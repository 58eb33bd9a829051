//! Core logic for locating documents in the DOJ Epstein files disclosure.
//!
//! The disclosure is published as numbered, non-contiguous "datasets", each
//! owning an inclusive range of EFTA document ids. This crate maps an
//! arbitrary user-supplied identifier to its owning dataset (with a
//! best-effort fallback for the tabulated gaps between datasets), constructs
//! viewing URLs, computes prev/next navigation across dataset boundaries,
//! and models the extension-probing viewer session.
//!
//! Everything here is synchronous and pure over the [`registry::Registry`];
//! the only I/O lives behind [`probe::DocumentLoader`] and in the binary.

pub mod app;
pub mod domain;
pub mod error;
pub mod lookup;
pub mod navigate;
pub mod output;
pub mod probe;
pub mod registry;
pub mod tui;
pub mod urls;
