//! # location-recommender
//!
//! Client-side controllers for a semantic location recommendation service
//! and its companion chat backend.
//!
//! ```text
//!   user input
//!       │
//!       ▼
//!  ┌──────────────┐   None (blank input) → nothing happens
//!  │ Query encoder │──────────────────────────────────────────
//!  └──────┬───────┘
//!         │ path + ordered params
//!         ▼
//!  ┌──────────────┐   503 / 500 / other status / transport
//!  │   Executor    │────────────────────► FetchError ──┐
//!  └──────┬───────┘                                     │
//!         │ JSON body (malformed → null)                │
//!         ▼                                             │
//!  ┌──────────────┐                                     │
//!  │  Normalizer   │  Ranked | Listing | Unrecognized    │
//!  └──────┬───────┘                                     │
//!         │ SearchResults                               │
//!         ▼                                             ▼
//!  ┌─────────────────────────────────────────────────────────┐
//!  │ SearchController: Idle → Loading → Success | Error       │
//!  │ commit only if generation == latest                      │
//!  └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for endpoints, defaults and timeouts
//! - [`models`] - Canonical results, search state, chat turns, wire bodies
//! - [`error`] - Classified request failures and their user-facing messages
//! - [`api::query`] - Canonical parameter encoding for the search endpoints
//! - [`api::executor`] - One HTTP call per invocation, outcome classification
//! - [`api::normalize`] - Envelope classification and permissive item reading
//! - [`search`] - Generation-tagged search state machine
//! - [`chat`] - Append-only conversation with serialized exchanges
//! - [`state`] - Per-page session owning one of each controller

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod state;
