use auctionlab_engine::{ArtifactLayout, SyntheticEngine};
use auctionlab_sim::{ExperimentPreset, Harness, ScenarioCatalog, ScenarioStatus, SimResult};
use auctionlab_types::HarnessError;

fn run(key: &str, dir: &std::path::Path) -> (SimResult, Vec<String>) {
    let layout = ArtifactLayout::new(dir);
    let mut harness = Harness::new(SyntheticEngine::new(layout.clone()), layout);
    let result = harness
        .run_scenario(&ScenarioCatalog::standard(), key, &ExperimentPreset::default())
        .unwrap();
    let calls = harness.engine().calls().to_vec();
    (result, calls)
}

fn print_result(result: &SimResult) {
    println!("Results:");
    println!("  Sessions: {}", result.trial_ids.len());
    println!("  Records: {}", result.summary.total_records);
    println!("  Per session: {:?}", result.summary.records_per_session);
    println!(
        "  Price range: {:?} - {:?}",
        result.summary.min_price, result.summary.max_price
    );
    println!("  Runtime: {:.2}ms", result.runtime_ms);
}

/// One reference session
#[test]
fn test_one_trader_one_session() {
    println!("\n━━━ SCENARIO: 1-Trader 1-Session ━━━");

    let dir = tempfile::tempdir().unwrap();
    let (result, calls) = run("one-trader-one-session", dir.path());
    print_result(&result);

    assert_eq!(result.trial_ids, vec!["demo_0"]);
    assert_eq!(calls, vec!["demo_0"]);
    assert!(result.baseline_trial_id.is_none(), "baseline is opt-in");
    // periodic arrivals every 60s over [0, 600) trade at least once per step
    assert!(result.summary.total_records >= 10);
    assert!(result.series.records().iter().all(|r| (80.0..=320.0).contains(&r.price)));
    assert!(result.series.records().iter().all(|r| r.time >= 0.0 && r.time < 600.0));

    println!("✅ 1-Trader 1-Session: PASSED\n");
}

/// Ten independent sessions concatenated without re-basing time
#[test]
fn test_one_trader_multi_session() {
    println!("\n━━━ SCENARIO: 1-Trader Multi-Session ━━━");

    let dir = tempfile::tempdir().unwrap();
    let (result, calls) = run("one-trader-multi-session", dir.path());
    print_result(&result);

    let expected: Vec<String> = (0..10).map(|i| format!("demo_{}", i)).collect();
    assert_eq!(result.trial_ids, expected);
    assert_eq!(calls, expected);
    assert_eq!(result.series.sessions().len(), 10);
    assert_eq!(
        result.summary.records_per_session.iter().sum::<usize>(),
        result.summary.total_records
    );

    // each session restarts its clock at zero
    for i in 0..10 {
        let records = result.series.session_records(i).unwrap();
        assert!(!records.is_empty());
        assert!(records[0].time < 60.0);
    }

    println!("✅ 1-Trader Multi-Session: PASSED\n");
}

#[test]
fn test_periodic_to_poisson() {
    println!("\n━━━ SCENARIO: Periodic to Poisson ━━━");

    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run("periodic-to-poisson", dir.path());
    print_result(&result);

    assert_eq!(result.trial_ids.len(), 10);
    assert!(result.summary.total_records > 0);
    assert!(result.series.records().iter().all(|r| r.time < 600.0));

    println!("✅ Periodic to Poisson: PASSED\n");
}

#[test]
fn test_multi_trader_multi_session() {
    println!("\n━━━ SCENARIO: Multi-Trader Multi-Session ━━━");

    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run("multi-trader-multi-session", dir.path());
    print_result(&result);

    assert_eq!(result.trial_ids.len(), 10);
    assert!(result.summary.total_records > 0);

    println!("✅ Multi-Trader Multi-Session: PASSED\n");
}

#[test]
fn test_multi_type() {
    println!("\n━━━ SCENARIO: Multi-Type ━━━");

    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run("multi-type", dir.path());
    print_result(&result);

    assert_eq!(result.trial_ids, vec!["demo_0"]);
    assert!(result.summary.total_records > 0);

    println!("✅ Multi-Type: PASSED\n");
}

/// Prices after the shock come from the raised range
#[test]
fn test_shock() {
    println!("\n━━━ SCENARIO: Shock Introduction ━━━");

    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run("shock", dir.path());
    print_result(&result);

    assert_eq!(result.trial_ids, vec!["demo_0"]);
    for record in result.series.records() {
        if record.time < 300.0 {
            assert!((80.0..=320.0).contains(&record.price), "pre-shock {:?}", record);
        } else {
            assert!((300.0..=400.0).contains(&record.price), "post-shock {:?}", record);
        }
    }

    println!("✅ Shock Introduction: PASSED\n");
}

#[test]
fn test_baseline_runs_first_and_is_not_aggregated() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::new(dir.path());
    let mut harness = Harness::new(SyntheticEngine::new(layout.clone()), layout)
        .with_prefix("run_")
        .with_baseline(true);

    let result = harness
        .run_scenario(
            &ScenarioCatalog::standard(),
            "one-trader-multi-session",
            &ExperimentPreset::default(),
        )
        .unwrap();

    assert_eq!(result.baseline_trial_id.as_deref(), Some("run_"));
    assert_eq!(harness.engine().calls()[0], "run_");
    assert_eq!(harness.engine().calls().len(), 11);
    assert_eq!(result.trial_ids.len(), 10);
    assert!(result.series.sessions().iter().all(|s| s.trial_id != "run_"));
}

#[test]
fn test_failure_surfaces_without_aggregation() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::new(dir.path());
    let engine = SyntheticEngine::new(layout.clone()).fail_on("demo_3");
    let mut harness = Harness::new(engine, layout);

    let err = harness
        .run_scenario(
            &ScenarioCatalog::standard(),
            "one-trader-multi-session",
            &ExperimentPreset::default(),
        )
        .unwrap_err();

    assert!(matches!(err, HarnessError::EngineExecution { .. }));
    assert_eq!(harness.engine().calls().len(), 4);
}

#[test]
fn test_every_ready_entry_runs() {
    let catalog = ScenarioCatalog::standard();
    for entry in catalog.entries() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path());
        let mut harness = Harness::new(SyntheticEngine::new(layout.clone()), layout);
        let outcome = harness.run_scenario(&catalog, entry.key, &ExperimentPreset::default());

        match entry.status() {
            ScenarioStatus::Ready => {
                let result = outcome.unwrap();
                println!("{}: {} records", entry.key, result.summary.total_records);
                assert_eq!(result.scenario_key, entry.key);
            }
            ScenarioStatus::UnderConstruction => {
                assert!(matches!(outcome, Err(HarnessError::Unimplemented(_))));
                assert!(harness.engine().calls().is_empty());
            }
        }
    }
}
