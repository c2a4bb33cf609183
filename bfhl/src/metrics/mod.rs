//! Service metrics recorded through the `metrics` facade.
//!
//! Counters are exported by the Prometheus recorder that [`crate::build_router`] installs when
//! `enable_metrics` is set; without a recorder they are no-ops. HTTP-level metrics (request
//! counts, latencies) come from the `axum-prometheus` layer itself.

use metrics::counter;

use crate::classify::Report;

/// Classification requests that produced a report
pub const CLASSIFICATIONS_TOTAL: &str = "bfhl_classifications_total";
/// Reports whose numeric tokens contained a prime
pub const PRIME_FOUND_TOTAL: &str = "bfhl_prime_found_total";
/// Supplied file payloads, labelled by `valid`
pub const FILE_VALIDATIONS_TOTAL: &str = "bfhl_file_validations_total";

/// Records the outcome of one classification request.
pub fn record_report(report: &Report) {
    counter!(CLASSIFICATIONS_TOTAL).increment(1);

    if report.classification.has_prime {
        counter!(PRIME_FOUND_TOTAL).increment(1);
    }

    if report.file_supplied {
        let valid = if report.file.valid { "true" } else { "false" };
        counter!(FILE_VALIDATIONS_TOTAL, "valid" => valid).increment(1);
    }
}
