//! Change feed integration tests.
//!
//! - At-most-once delivery per record across ticks
//! - Permission handling without backlog replay
//! - Background polling thread and the event emitter sink

#[path = "../support/mod.rs"]
mod support;

mod basic;
mod threaded;
