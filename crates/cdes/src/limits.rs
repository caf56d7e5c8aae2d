//! Bounds applied when traversing or decoding untrusted lineage data.

/// Maximum number of generations a single lineage branch may nest.
///
/// Real breeding histories rarely document more than a dozen generations;
/// anything past this is treated as malformed input.
pub const MAX_LINEAGE_DEPTH: usize = 64;

/// Maximum value accepted for any percentage field (indica/sativa split,
/// genetic contribution, cannabinoid and terpene content).
pub const MAX_PERCENT: f64 = 100.0;
