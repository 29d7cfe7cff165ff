//! End-to-end integration test for the job pipeline
//!
//! This test exercises the complete flow: job file -> validation -> plan -> apply.

use recon_core::{ActionStatus, JobConfig, JobSpec, Reconciler};
use recon_fs::{ConfigStore, LocalFs};
use recon_test_utils::TestDirs;

/// Set up a dataset where half of train also appears in val
fn setup_dataset() -> TestDirs {
    let dirs = TestDirs::new();
    dirs.populate(
        "data/train",
        &["001.png", "002.png", "003.png", "004.png"],
    );
    dirs.populate("data/val", &["002.png", "004.png"]);
    dirs
}

fn write_job(dirs: &TestDirs, dry_run: bool) -> std::path::PathBuf {
    let job = serde_json::json!({
        "operation": "match",
        "source": dirs.path("data/train"),
        "reference": dirs.path("data/val"),
        "key": { "mode": "name-size" },
        "action": { "kind": "move", "dest": dirs.path("data/excluded") },
        "dry_run": dry_run,
    });
    dirs.write("job.json", job.to_string())
}

#[test]
fn test_job_file_dry_run_then_real_run() {
    let dirs = setup_dataset();
    let store = ConfigStore::new();
    let reconciler = Reconciler::new(LocalFs);

    // Dry run from the job file: nothing moves, both destinations are listed
    let config: JobConfig = store.load(&write_job(&dirs, true)).unwrap();
    config.validate().unwrap();
    let prepared = reconciler.prepare(&config.job.resolved()).unwrap();
    let preview = reconciler.execute(&prepared, config.dry_run);

    assert_eq!(preview.planned, 2);
    assert!(preview.outcomes.iter().all(|o| o.status == ActionStatus::Planned));
    assert_eq!(dirs.names("data/train").len(), 4);
    dirs.assert_file_not_exists("data/excluded");

    // Real run moves exactly the previewed files
    let config: JobConfig = store.load(&write_job(&dirs, false)).unwrap();
    let prepared = reconciler.prepare(&config.job.resolved()).unwrap();
    let result = reconciler.execute(&prepared, config.dry_run);

    assert_eq!((result.succeeded, result.failed), (2, 0));
    let moved: Vec<_> = result
        .outcomes
        .iter()
        .map(|o| o.destination.clone().unwrap())
        .collect();
    let previewed: Vec<_> = preview
        .outcomes
        .iter()
        .map(|o| o.destination.clone().unwrap())
        .collect();
    assert_eq!(moved, previewed);
    assert_eq!(dirs.names("data/train"), vec!["001.png", "003.png"]);
    assert_eq!(dirs.names("data/excluded"), vec!["002.png", "004.png"]);
}

#[test]
fn test_rerun_is_a_no_op() {
    let dirs = setup_dataset();
    let job = JobSpec::Prune {
        target: dirs.path("data/train"),
        reference: dirs.path("data/val"),
    };
    let reconciler = Reconciler::new(LocalFs);

    let first = reconciler.run(&job, false).unwrap();
    let second = reconciler.run(&job, false).unwrap();

    assert_eq!(first.succeeded, 2);
    assert_eq!(second.attempted, 0);
    assert_eq!(dirs.names("data/train"), vec!["002.png", "004.png"]);
}
