//! The timer entity and the store that owns the collection.
//!  - A timer is either stopped (`running_since` is `None`) or running since a moment.
//!  - Displayed time is `elapsed`, plus `now - running_since` while running.
//!  - The store replaces snapshots on every mutation and forwards the mutation to sync.

pub mod entities;
pub mod store;
