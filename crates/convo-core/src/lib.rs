//! # convo-core
//!
//! The contract between a conversational host and its capability plugins.
//!
//! A host processes one [`Turn`] at a time: it parses the inbound request
//! into a read-only [`TurnRequest`] snapshot, rehydrates the session
//! scratchpad it persisted after the previous turn, and hands both to the
//! registered plugins. Plugins read the snapshot, mutate the scratchpad, and
//! enqueue [`Directive`]s the host renders into the outbound response.
//!
//! ```text
//! ┌──────────┐   TurnRequest (read-only)   ┌───────────────┐
//! │   Host   │────────────────────────────▶│  Turn<D>      │
//! │          │   data: D (scratchpad)      │               │
//! │          │◀────────────────────────────│  directives   │
//! └──────────┘   drained after the turn    └───────────────┘
//! ```
//!
//! The host guarantees a turn's `Turn` value is owned exclusively by the
//! code processing that turn; there is no cross-turn synchronization beyond
//! the host re-supplying the persisted scratchpad on the next turn.

pub mod entitlement;
pub mod plugin;
pub mod turn;

pub use entitlement::{Entitlement, EntitlementGroup, PurchaseDetails};
pub use plugin::TurnPlugin;
pub use turn::{Directive, Turn, TurnRequest, UserSnapshot};
