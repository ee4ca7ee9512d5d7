//! Configuration metrics tracking using OpenTelemetry.

use opentelemetry::metrics::{Counter, Histogram, Meter};
use std::time::Instant;

/// Metrics collector for configuration lookups.
///
/// Tracks lookups, misses, conversion failures and lookup latency using
/// OpenTelemetry metrics.
///
/// # Examples
///
/// ```rust,no_run
/// use ordinal_config::metrics::ConfigMetrics;
/// use opentelemetry::global;
///
/// let meter = global::meter("ordinal-config");
/// let metrics = ConfigMetrics::new(meter);
///
/// // Track a lookup
/// let timer = metrics.start_lookup();
/// // ... resolve the property ...
/// metrics.record_lookup(timer, true);
/// ```
#[derive(Clone)]
pub struct ConfigMetrics {
    lookups: Counter<u64>,
    misses: Counter<u64>,
    conversion_failures: Counter<u64>,
    lookup_duration: Histogram<f64>,
}

impl ConfigMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let lookups = meter
            .u64_counter("ordinal_config.lookups")
            .with_description("Total number of property lookups")
            .build();

        let misses = meter
            .u64_counter("ordinal_config.lookups.misses")
            .with_description("Number of lookups that found no value")
            .build();

        let conversion_failures = meter
            .u64_counter("ordinal_config.conversion.failures")
            .with_description("Number of values rejected by a converter")
            .build();

        let lookup_duration = meter
            .f64_histogram("ordinal_config.lookup.duration")
            .with_description("Duration of lookups through the interceptor chain in seconds")
            .with_unit("s")
            .build();

        Self {
            lookups,
            misses,
            conversion_failures,
            lookup_duration,
        }
    }

    /// Start a lookup timer.
    ///
    /// Pass the returned `Instant` to [`record_lookup`](Self::record_lookup).
    pub fn start_lookup(&self) -> Instant {
        self.lookups.add(1, &[]);
        Instant::now()
    }

    /// Record a finished lookup.
    ///
    /// # Arguments
    ///
    /// * `start` - The `Instant` returned from `start_lookup()`
    /// * `found` - Whether a value was found
    pub fn record_lookup(&self, start: Instant, found: bool) {
        self.lookup_duration.record(start.elapsed().as_secs_f64(), &[]);
        if !found {
            self.misses.add(1, &[]);
        }
    }

    /// Record a value a converter rejected.
    pub fn record_conversion_failure(&self) {
        self.conversion_failures.add(1, &[]);
    }
}
