//! Centralized limits and thresholds for the analyzer.
//!
//! Centralizing these values prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit.

/// Maximum embedding depth walked by selector promotion (§4.4b) before the
/// analyzer treats further embedded fields as unreachable. A real program's
/// embedding chains are a handful of levels deep at most; this is a circuit
/// breaker against a malformed input graph, not a language limit.
pub const MAX_PROMOTION_DEPTH: usize = 64;

/// Maximum number of packages a single `dep_level` memoized DFS (§4.1) will
/// visit before concluding the input violates the "no cycles among packages"
/// contract and aborting with a fatal error.
pub const MAX_PACKAGE_WALK_VISITS: usize = 1_000_000;
