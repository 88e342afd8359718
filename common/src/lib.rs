//! Shared building blocks for `lanmap`.
//!
//! * [`network`]: addresses, ranges, interfaces and the scan data model.
//! * [`diagnostic`]: the per-scan, timestamped event trail.
//! * [`error`]: error types crossing crate boundaries.
//! * [`config`]: tunables shared by the core and the CLI.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod network;
