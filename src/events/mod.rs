//! Run events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted while a run drives its items.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: the run loop (`core::run::Run`), one per `Runner::run` call.
//! - **Consumers**: anything holding a receiver from [`Runner::subscribe`](crate::Runner::subscribe).
//!
//! Events complement the per-outcome hooks: hooks are the caller-facing
//! success/retry/failure callbacks, events additionally expose scheduling
//! (which delay was chosen, for which offset) and settlement.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
