//! Integration tests for fftbench
//!
//! These tests drive the sweep engine end to end with small fake transforms
//! and the built-in reference cases.

use fftbench::{
    BenchmarkReport, CancellationToken, CaseError, CaseRegistry, ProgressEvent, RunDocument,
    RunMeta, RunStatus, SweepPlan, SweepSettings, SweepStatus, SystemInfo, TimingOutcome,
    Transform, WorkerOptions, builtin_registry, generate_csv_report, generate_json_report, record,
    render, run_case, sawtooth, spawn_sweep, sweep,
};

/// Transform that only counts calls and can reject one size
struct Stub {
    name: &'static str,
    reject: Option<usize>,
    len: usize,
}

impl Stub {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            reject: None,
            len: 0,
        }
    }

    fn rejecting(name: &'static str, size: usize) -> Self {
        Self {
            reject: Some(size),
            ..Self::new(name)
        }
    }
}

impl Transform for Stub {
    fn name(&self) -> &str {
        self.name
    }

    fn initialize(&mut self, data: &[f64]) -> Result<(), CaseError> {
        if self.reject == Some(data.len()) {
            return Err(CaseError::unsupported(data.len(), "not this one"));
        }
        self.len = data.len();
        Ok(())
    }

    fn transform(&mut self, _forward: bool) -> Result<(), CaseError> {
        std::hint::black_box(self.len);
        Ok(())
    }
}

fn registry_of(stubs: Vec<Stub>) -> CaseRegistry {
    let mut registry = CaseRegistry::new();
    for stub in stubs {
        registry.register_transform(stub).unwrap();
    }
    registry
}

/// Test that the input signal is deterministic
#[test]
fn test_signal_is_deterministic() {
    for length in [0, 1, 31, 32, 33, 1024] {
        let a = sawtooth(length);
        let b = sawtooth(length);
        assert_eq!(a.len(), length);
        assert_eq!(a, b);
    }
}

/// Test that a single run reports the requested repeat
#[test]
fn test_run_reports_repeat() {
    let mut registry = registry_of(vec![Stub::new("a")]);
    let case = &mut registry.as_mut_slice()[0];
    let data = sawtooth(256);

    for repeat in [1, 3, 17] {
        let outcome = run_case(case, &data, repeat).unwrap();
        assert_eq!(outcome.repeat, repeat);
    }
    assert_eq!(case.size(), 256);
}

/// Test that recording keeps every name at a size
#[test]
fn test_aggregator_keeps_names() {
    let mut report = BenchmarkReport::new();
    record(&mut report, 8, "A", TimingOutcome::new(10, 1, 0));
    record(&mut report, 8, "B", TimingOutcome::new(20, 1, 0));

    let at_8 = report.size_result(8).unwrap();
    assert!(at_8.contains("A"));
    assert!(at_8.contains("B"));
    assert_eq!(at_8.len(), 2);
}

/// Test cancellation after step 4 of 9
#[test]
fn test_cancel_mid_sweep() {
    let mut registry = registry_of(vec![Stub::new("a"), Stub::new("b"), Stub::new("c")]);
    let plan = SweepPlan::new(7, 9, 1).unwrap();
    assert_eq!(plan.total_steps(3), 9);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let mut events: Vec<ProgressEvent> = Vec::new();

    let outcome = sweep(
        registry.as_mut_slice(),
        &plan,
        |event| {
            if event.step == 4 {
                trigger.cancel();
            }
            events.push(event);
        },
        &cancel,
    )
    .unwrap();

    assert_eq!(outcome.status, SweepStatus::Cancelled);
    assert_eq!(outcome.steps, 4);
    assert_eq!(events.iter().filter(|e| e.is_step()).count(), 4);
    assert!(events.iter().all(|e| e.total == 9));
    let announced: Vec<_> = events.iter().filter_map(|e| e.label.as_deref()).collect();
    assert_eq!(announced, vec!["a", "b"]);

    let report = &outcome.report;
    assert_eq!(report.outcome_count(), 4);
    for size in [128, 256, 512] {
        assert!(report.get(size, "a").is_some());
        assert!(report.get(size, "c").is_none());
    }
    assert!(report.get(128, "b").is_some());
    assert!(report.get(256, "b").is_none());
    assert!(report.get(512, "b").is_none());
}

/// Test that a disabled case contributes no steps
#[test]
fn test_disabled_case_removes_steps() {
    let mut registry = registry_of(vec![Stub::new("X"), Stub::new("Y")]);
    registry.set_enabled("X", false).unwrap();
    let plan = SweepPlan::new(7, 7, 2).unwrap();

    let mut total = None;
    let outcome = sweep(
        registry.as_mut_slice(),
        &plan,
        |event| total = Some(event.total),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(total, Some(1));
    assert_eq!(outcome.steps, 1);
    let at_128 = outcome.report.size_result(128).unwrap();
    assert_eq!(at_128.len(), 1);
    assert!(at_128.contains("Y"));
    assert!(!at_128.contains("X"));
}

/// Test that a rejected size does not stop the sweep
#[test]
fn test_rejected_size_continues() {
    let mut registry = registry_of(vec![Stub::rejecting("picky", 2048), Stub::new("plain")]);
    let plan = SweepPlan::new(10, 12, 1).unwrap();

    let outcome = sweep(
        registry.as_mut_slice(),
        &plan,
        |_| {},
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(outcome.status, SweepStatus::Completed);
    assert_eq!(outcome.steps, 6);

    let report = &outcome.report;
    assert!(report.get(1024, "picky").is_some());
    assert!(report.get(2048, "picky").is_none());
    assert!(report.unsupported_at(2048, "picky").is_some());
    assert!(report.get(4096, "picky").is_some());
    for size in [1024, 2048, 4096] {
        assert!(report.get(size, "plain").is_some());
    }

    let text = render(report);
    assert!(text.contains("unsupported (not this one)"));
}

/// Test that rendering the same report twice is byte-identical
#[test]
fn test_render_is_deterministic() {
    let mut registry = registry_of(vec![Stub::new("b"), Stub::new("a")]);
    let plan = SweepPlan::new(4, 6, 3).unwrap();
    let outcome = sweep(
        registry.as_mut_slice(),
        &plan,
        |_| {},
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(render(&outcome.report), render(&outcome.report));
    assert_eq!(
        generate_csv_report(&outcome.report),
        generate_csv_report(&outcome.report)
    );
}

/// Test the worker thread with the built-in cases
#[test]
fn test_worker_sweeps_builtin_cases() {
    let registry = builtin_registry().unwrap();
    let plan = SweepPlan::new(4, 6, 2).unwrap();

    let handle = spawn_sweep(registry.into_cases(), plan, WorkerOptions::default()).unwrap();
    assert_eq!(handle.total_steps(), 6);

    let steps: Vec<usize> = handle
        .progress()
        .iter()
        .filter(|e| e.is_step())
        .map(|e| e.step)
        .collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 5, 6]);

    let result = handle.join().unwrap();
    assert_eq!(result.cases.len(), 2);

    let outcome = result.outcome.unwrap();
    assert_eq!(outcome.status, SweepStatus::Completed);
    for size in [16, 32, 64] {
        assert_eq!(outcome.report.get(size, "radix2").unwrap().repeat, 2);
        assert_eq!(outcome.report.get(size, "naive-dft").unwrap().repeat, 2);
    }
}

/// Test that a JSON document carries the report and status
#[test]
fn test_json_document() {
    let mut report = BenchmarkReport::new();
    record(&mut report, 512, "radix2", TimingOutcome::new(5_000, 10, 0));

    let meta = RunMeta {
        version: "0.1.0".to_string(),
        timestamp: "2026-01-01T00:00:00Z".parse().unwrap(),
        system: SystemInfo {
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
            cpu: "Test CPU".to_string(),
            cpu_cores: 4,
        },
        sweep: SweepSettings {
            start_exponent: 9,
            end_exponent: 9,
            repeat: 10,
        },
    };
    let document = RunDocument::new(meta, RunStatus::Cancelled, report);
    let json = generate_json_report(&document).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["status"], "cancelled");
    assert_eq!(value["meta"]["sweep"]["repeat"], 10);
}
