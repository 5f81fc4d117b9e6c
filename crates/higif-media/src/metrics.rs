//! Generation metrics.
//!
//! Counters only; no exporter is wired here, so they are no-ops unless
//! the embedding process installs a recorder.

use metrics::counter;

use higif_models::Variant;

/// Metric name constants for consistency.
pub mod names {
    /// Total generations by variant and outcome.
    pub const GENERATIONS_TOTAL: &str = "higif_generations_total";
}

/// Record a completed generation attempt.
pub fn record_generation(variant: Variant, success: bool) {
    let outcome = if success { "ok" } else { "failed" };

    counter!(
        names::GENERATIONS_TOTAL,
        "variant" => variant.as_label(),
        "outcome" => outcome
    )
    .increment(1);
}
