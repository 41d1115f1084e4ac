use skillbench_bench::analytics::render_table;
use skillbench_bench::config::BenchmarkConfig;
use skillbench_bench::runner::ActiveLearningRunner;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
league:
  seed: 4242
  draw_rate: 0.1
  teams:
    - name: "alpha"
      skill: 32.0
    - name: "bravo"
      skill: 26.0
    - name: "charlie"
      skill: 20.0
    - name: "delta"
      skill: 14.0
    - name: "echo"
      skill: 8.0
rounds: 60
emulators:
  - name: "trueskill"
    kind: "true_skill"
    params:
      tau: 0.0
  - name: "static"
    kind: "static"
acquirers: ["least_seen", "max_uncertainty"]
outputs:
  telemetry_dir: "{telemetry}"
logging:
  enable_structured: false
"#,
        telemetry = output_dir.join("telemetry").display()
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn benchmark_smoke_test_is_deterministic() {
    let dir = tempdir().expect("temp dir");

    let run = || {
        let config = load_config(dir.path());
        let outputs = config.resolved_outputs();
        ActiveLearningRunner::new(config, outputs)
            .expect("runner created")
            .run()
            .expect("benchmark completes")
    };
    let summary = run();

    assert_eq!(summary.rounds, 60);
    assert_eq!(summary.reports.len(), 3);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].emulator, "static");
    assert_eq!(summary.skipped[0].acquirer, "MaxUncertainty");
    assert!(summary.telemetry_path.is_none());

    for report in &summary.reports {
        assert_eq!(report.steps, 60);
        assert!((0.0..=1.0).contains(&report.mean_brier));
        assert!(report.brier_ci95.0 <= report.mean_brier);
        assert!(report.mean_brier <= report.brier_ci95.1);
        assert_eq!(report.teams_seen, 5);
    }

    let trueskill_least_seen = summary
        .reports
        .iter()
        .find(|report| report.emulator == "trueskill" && report.acquirer == "LeastSeen")
        .expect("trueskill/least_seen report");
    assert!(
        trueskill_least_seen.ordering_accuracy >= 0.7,
        "ordering accuracy {}",
        trueskill_least_seen.ordering_accuracy
    );

    let again = run();
    assert_eq!(summary.reports, again.reports);
    assert_eq!(summary.skipped, again.skipped);

    let table = render_table(&summary.reports);
    assert!(table.contains("trueskill"));
    assert!(table.contains("static"));
    assert!(!dir.path().join("telemetry").exists());
}
