//! Project-tagged timers that can be started, stopped and watched live.
//! Local state is the source of truth: every change is applied to the in-memory store first and
//! mirrored to persistence in the background, without waiting for it.
//!

pub mod cli;
pub mod display;
pub mod storage;
pub mod sync;
pub mod timers;
pub mod utils;
