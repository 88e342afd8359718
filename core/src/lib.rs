//! Scan pipeline for `lanmap`.
//!
//! * [`prober`]: one-shot reachability checks.
//! * [`neighbor`]: neighbor (ARP) table acquisition and parsing.
//! * [`discovery`]: whole-subnet auto-discovery used when no range is given.
//! * [`scanner`]: the coordinator tying the pieces together.

pub mod discovery;
pub mod neighbor;
pub mod prober;
pub mod scanner;
pub mod system;
