// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::{start_metrics_server, RuntimeInfo};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Command outcomes and latency, by command name
// - Post-commit event dispatch, by topic
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Command Metrics
    pub commands_total: IntCounterVec,
    pub command_duration: HistogramVec,

    // Event Dispatch Metrics
    pub events_dispatched: IntCounterVec,
    pub events_dispatch_failed: IntCounterVec,
    pub dispatch_retry_attempts: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let commands_total = IntCounterVec::new(
            Opts::new("commands_total", "Total commands handled"),
            &["command", "outcome"],
        )?;
        registry.register(Box::new(commands_total.clone()))?;

        let command_duration = HistogramVec::new(
            HistogramOpts::new("command_duration_seconds", "Command handling duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["command"],
        )?;
        registry.register(Box::new(command_duration.clone()))?;

        let events_dispatched = IntCounterVec::new(
            Opts::new("events_dispatched_total", "Domain events delivered after commit"),
            &["topic"],
        )?;
        registry.register(Box::new(events_dispatched.clone()))?;

        let events_dispatch_failed = IntCounterVec::new(
            Opts::new("events_dispatch_failed_total", "Domain events that could not be delivered"),
            &["topic"],
        )?;
        registry.register(Box::new(events_dispatch_failed.clone()))?;

        let dispatch_retry_attempts = IntCounterVec::new(
            Opts::new("dispatch_retry_attempts_total", "Retried event delivery attempts"),
            &["topic"],
        )?;
        registry.register(Box::new(dispatch_retry_attempts.clone()))?;

        Ok(Self {
            registry,
            commands_total,
            command_duration,
            events_dispatched,
            events_dispatch_failed,
            dispatch_retry_attempts,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record the outcome of one command
    pub fn record_command(&self, command: &str, outcome: &str, elapsed_secs: f64) {
        self.commands_total.with_label_values(&[command, outcome]).inc();
        self.command_duration.with_label_values(&[command]).observe(elapsed_secs);
    }

    pub fn record_dispatched(&self, topic: &str) {
        self.events_dispatched.with_label_values(&[topic]).inc();
    }

    pub fn record_dispatch_failed(&self, topic: &str) {
        self.events_dispatch_failed.with_label_values(&[topic]).inc();
    }

    pub fn record_dispatch_retry(&self, topic: &str) {
        self.dispatch_retry_attempts.with_label_values(&[topic]).inc();
    }
}
