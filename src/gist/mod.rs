//! # Gist companion utility
//!
//! - [`model`]: API payloads.
//! - [`client`]: the [`client::GistApi`] seam and its GitHub implementation.
//! - [`filter`]: date window, ordering and rendering for listings.
//! - [`state`]: last-sync bookkeeping.
//! - [`sync`]: planning and applying a two-way sync.

pub mod client;
pub mod filter;
pub mod model;
pub mod state;
pub mod sync;
