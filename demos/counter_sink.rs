//! Counts guard outcomes per role with a metrics sink.
//!
//! Run with: cargo run --example counter_sink --features observability

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use aula_rbac::metrics::{EvaluationStats, MetricsSink, ReloadStats};
use aula_rbac::{AccessEngine, GuardState, Principal, Role, SCHOOL_POLICY};

/// Tallies `(role, state)` pairs; anonymous requests are filed under `-`.
#[derive(Default)]
struct OutcomeCounterSink {
    counts: Mutex<BTreeMap<(String, GuardState), u64>>,
    reloads: Mutex<u64>,
}

impl OutcomeCounterSink {
    fn print_stats(&self) {
        println!("\n=== Guard outcomes ===");
        if let Ok(counts) = self.counts.lock() {
            for ((role, state), count) in counts.iter() {
                println!("  {role:<12} {state:<14} {count}");
            }
        }
        if let Ok(reloads) = self.reloads.lock() {
            println!("reloads: {reloads}");
        }
    }
}

impl MetricsSink for OutcomeCounterSink {
    fn on_evaluation(&self, stats: &EvaluationStats) {
        let role = stats.role.clone().unwrap_or_else(|| "-".to_string());
        if let Ok(mut counts) = self.counts.lock() {
            *counts.entry((role, stats.state)).or_insert(0) += 1;
        }
    }

    fn on_reload(&self, _stats: &ReloadStats) {
        if let Ok(mut reloads) = self.reloads.lock() {
            *reloads += 1;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(OutcomeCounterSink::default());
    aula_rbac::metrics::set_sink(sink.clone());

    let engine = AccessEngine::school()?;
    let paths = [
        "/",
        "/usuarios",
        "/calificaciones",
        "/mis-calificaciones",
        "/pagos",
        "/finanzas/reportes",
    ];

    for role in [Role::Admin, Role::Profesor, Role::Alumno, Role::Apoderado] {
        let principal = Principal::with_role(role);
        for path in paths {
            engine.evaluate(Some(&principal), path);
        }
    }
    engine.evaluate(None, "/");
    engine.evaluate(Some(&Principal::without_role()), "/");

    engine.reload_from_str(SCHOOL_POLICY)?;

    sink.print_stats();
    Ok(())
}
