//! `Counters` port implementation (4.I): atomics-backed tallies and
//! their Prometheus text exposition.

pub mod counters;
pub mod prometheus;

pub use counters::{AtomicCounters, CountersSnapshot};
