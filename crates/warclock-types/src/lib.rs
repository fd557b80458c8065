//! Shared type definitions for the Warclock bot core.
//!
//! This crate is the single source of truth for the types that cross
//! crate boundaries in the Warclock workspace: war lifecycle events,
//! outbound action payloads, and the enumerations the scheduler and
//! dispatcher agree on.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for delayed-action identifiers
//! - [`enums`] -- Enumeration types (delivery kinds, trigger palette,
//!   ambient behaviors, war phases)
//! - [`events`] -- Typed [`WarEvent`]s emitted by the scheduler tick
//! - [`structs`] -- War snapshots and outbound line payloads
//!
//! [`WarEvent`]: events::WarEvent

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionKind, AmbientKind, MarkovFlavor, TriggerKind, WarPhase};
pub use events::WarEvent;
pub use ids::ActionId;
pub use structs::{OutboundLine, TimedLine, WarSnapshot};
