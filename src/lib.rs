//! # Gallery Client
//!
//! A client for a paginated image-gallery REST API. It fetches collections,
//! albums and images, normalizes the loosely-shaped records the server sends
//! into strict entities with resolved image URLs, and carries the navigation
//! state a gallery view needs: the page bar, lightbox stepping and the fetch
//! lifecycle.
//!
//! # Architecture: One-Way Data Flow
//!
//! ```text
//! Transport  →  GalleryClient  →  api (wire records)  →  Transformer  →  entities
//!   (GET)        (status, join)      (envelope decode)     (PathResolver)   │
//!                                                                           ▼
//!                                              navigation / fetch_state / search
//! ```
//!
//! Each layer only knows the one beside it:
//!
//! - **Transport** moves bytes. It has no idea what a collection is.
//! - **Client** turns statuses and envelopes into `Option`/`Vec` results and
//!   owns all concurrency.
//! - **Transform** is pure: same record in, same entity out, no I/O.
//! - **Navigation** works on plain numbers and slices, never on the network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | Picks the first usable image reference and turns it into an absolute URL |
//! | [`api`] | Wire records and `{data, meta}` envelope decoding, tolerant of shape drift |
//! | [`types`] | Normalized entities (`Collection`, `Album`, `Image`) and `Paginated<T>` |
//! | [`transform`] | Wire record → entity, cover fallbacks, foreign-key back-references |
//! | [`transport`] | The `Transport` trait the client fetches through |
//! | [`http`] | `reqwest` implementation of `Transport` |
//! | [`client`] | `GalleryClient`: every endpoint, composite fetches, the landing view |
//! | [`navigation`] | Page bar with ellipsis, `Pager`, `Lightbox` |
//! | [`fetch_state`] | Idle → Loading → Loaded/Failed with stale-response protection |
//! | [`search`] | Case-insensitive search over fetched albums and images |
//! | [`config`] | `gallery.toml` loading, merging over defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Failures Become Absence
//!
//! The client never returns an error. A detail fetch that fails is `None`, a
//! paginated list that fails is `None` (records *and* metadata), an
//! unpaginated list that fails is empty. The cause is logged through
//! `tracing` and nothing more: views only ever show a generic message. The
//! types make the empty case impossible to forget.
//!
//! ## Keys, Not Pointers
//!
//! An image knows its album by id ([`types::ImageOwner`]); an album knows its
//! collection by id plus an optional name. Nothing holds a reference to its
//! parent, so entities are plain owned values that serialize cleanly.
//!
//! ## No Globals
//!
//! Base URL, storage URL, placeholder and page size all live in a
//! [`config::ClientConfig`] handed to [`client::GalleryClient`] at
//! construction. Tests build clients over a mock transport with their own
//! endpoints.
//!
//! ## Stale Responses Are Dropped
//!
//! Requests are never cancelled. [`fetch_state::PageView`] instead numbers
//! each fetch and ignores any response that isn't from the latest one, so a
//! slow page 2 can't overwrite page 3.

pub mod api;
pub mod client;
pub mod config;
pub mod fetch_state;
pub mod http;
pub mod navigation;
pub mod output;
pub mod resolve;
pub mod search;
pub mod transform;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
