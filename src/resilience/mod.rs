//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream fetch:
//!     → timeouts.rs (enforce per-fetch deadline)
//!     → On failure: surfaced to the caller tagged with its upstream
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: a failed fetch fails the request, and the sibling fetches
//!   run to completion with their results discarded

pub mod timeouts;
