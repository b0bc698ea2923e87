//! Common utilities for the mailstyle CSS front end.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Warning System** - deduplicated diagnostics routed through `tracing`

pub mod warning;
