//! Vendor-agnostic metrics collection via a pluggable sink.
//!
//! Consumers can count guard outcomes and catalog reloads without tying the
//! library to a metrics backend (Prometheus, OpenTelemetry, CloudWatch, ...).
//!
//! **Note:** This module is only available when the `observability` feature is enabled.
//!
//! ## Usage
//!
//! ```ignore
//! use aula_rbac::metrics::{EvaluationStats, MetricsSink, ReloadStats};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct DenialCounter {
//!     denied: AtomicU64,
//! }
//!
//! impl MetricsSink for DenialCounter {
//!     fn on_evaluation(&self, stats: &EvaluationStats) {
//!         if stats.state == aula_rbac::GuardState::Denied {
//!             self.denied.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn on_reload(&self, _stats: &ReloadStats) {}
//! }
//!
//! aula_rbac::metrics::set_sink(Arc::new(DenialCounter { denied: AtomicU64::new(0) }));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

use crate::types::GuardState;

/// Snapshot of one guard evaluation, passed to [`MetricsSink::on_evaluation`].
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationStats {
    /// Wall-clock time spent in the guard.
    pub duration: Duration,
    pub state: GuardState,
    /// The raw role claim, if any.
    pub role: Option<String>,
    pub path: String,
}

/// Passed to [`MetricsSink::on_reload`] after a successful catalog swap.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStats {
    pub reload_time: std::time::SystemTime,
}

/// Trait for consuming evaluation and reload metrics.
///
/// Called synchronously from `AccessEngine::evaluate` and
/// `AccessEngine::reload_from_str`, possibly from many threads at once.
/// Implementations must not block.
pub trait MetricsSink: Send + Sync {
    fn on_evaluation(&self, stats: &EvaluationStats);

    fn on_reload(&self, stats: &ReloadStats);
}

/// Default sink; metrics are dropped.
struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn on_evaluation(&self, _stats: &EvaluationStats) {}
    fn on_reload(&self, _stats: &ReloadStats) {}
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

fn sink() -> Arc<dyn MetricsSink> {
    SINK.get_or_init(|| Arc::new(NoOpSink)).clone()
}

/// Set the global metrics sink.
///
/// Call this once at startup, before the first evaluation. Later calls are
/// ignored with a warning.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!(
            "Metrics sink was already initialized. Ignoring subsequent set_sink call. Set the sink before the first evaluation."
        );
    }
}

pub(crate) fn record_evaluation(
    state: GuardState,
    duration: Duration,
    role: Option<String>,
    path: String,
) {
    sink().on_evaluation(&EvaluationStats {
        duration,
        state,
        role,
        path,
    });
}

pub(crate) fn record_reload() {
    sink().on_reload(&ReloadStats {
        reload_time: std::time::SystemTime::now(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_stats_serialization() {
        let stats = EvaluationStats {
            duration: Duration::from_millis(42),
            state: GuardState::Denied,
            role: Some("profesor".to_string()),
            path: "/usuarios".to_string(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["state"], "DENIED");
        assert_eq!(json["role"], "profesor");
        assert_eq!(json["path"], "/usuarios");
    }

    #[test]
    fn test_reload_stats_serialization() {
        let stats = ReloadStats {
            reload_time: std::time::SystemTime::now(),
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(!json.is_empty());
    }

    #[test]
    fn test_record_with_default_sink() {
        record_evaluation(
            GuardState::Granted,
            Duration::from_micros(3),
            None,
            "/".to_string(),
        );
        record_reload();
    }
}
