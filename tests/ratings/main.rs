//! Rating integration tests.
//!
//! Covers the derive macros on a payload defined outside the crate, the
//! generic aggregator over it, and the two rated domain facades.

mod review;
mod facades;
