//! Tests for applying actions to plans

use pretty_assertions::assert_eq;
use recon_core::{
    Action, ActionStatus, JobSpec, KeyMode, Reconciler, SetOperation, Transfer, apply_action,
    plan_by_set_operation, scan_directory,
};
use recon_fs::LocalFs;
use recon_test_utils::{FaultyFs, Op, TestDirs};

fn match_job(dirs: &TestDirs, key: KeyMode, action: Action) -> JobSpec {
    JobSpec::Match {
        source: dirs.path("train"),
        reference: dirs.path("val"),
        key,
        action,
    }
}

#[test]
fn test_delete_removes_matched_sources_only() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["a.png", "b.png", "c.png"]);
    dirs.populate("val", &["b.png", "c.png"]);

    let result = Reconciler::new(LocalFs)
        .run(&match_job(&dirs, KeyMode::Name, Action::Delete), false)
        .unwrap();

    assert_eq!((result.attempted, result.succeeded, result.failed), (2, 2, 0));
    assert_eq!(dirs.names("train"), vec!["a.png"]);
    assert_eq!(dirs.names("val"), vec!["b.png", "c.png"]);
}

#[test]
fn test_move_collisions_get_numbered_suffixes() {
    let dirs = TestDirs::new();
    let out = dirs.populate("out", &["x.png"]);
    let a = dirs.populate("a", &["x.png"]);
    let b = dirs.populate("b", &["x.png"]);
    let reference = dirs.populate("ref", &["x.png"]);

    let fs = LocalFs;
    let action = Action::Move { dest: out.clone() };
    for source in [&a, &b] {
        let plan = plan_by_set_operation(
            &scan_directory(&fs, source, &KeyMode::Name),
            &scan_directory(&fs, &reference, &KeyMode::Name),
            SetOperation::Intersection,
        );
        let result = apply_action(&fs, &plan, &action, false);
        assert_eq!(result.succeeded, 1);
    }

    assert_eq!(dirs.names("out"), vec!["x.png", "x_1.png", "x_2.png"]);
    assert!(dirs.names("a").is_empty());
    assert!(dirs.names("b").is_empty());
}

#[test]
fn test_copy_creates_destination_and_keeps_source() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["frame_000001.png", "frame_000002.png"]);
    dirs.populate("val", &["frame_000002.png"]);

    let action = Action::Copy {
        dest: dirs.path("out/nested"),
    };
    let result = Reconciler::new(LocalFs)
        .run(&match_job(&dirs, KeyMode::Name, action), false)
        .unwrap();

    assert_eq!(result.succeeded, 1);
    dirs.assert_file_content("out/nested/frame_000002.png", "frame_000002.png");
    dirs.assert_file_exists("train/frame_000002.png");
}

#[test]
fn test_dry_run_touches_nothing_and_previews_destinations() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["a.png", "b.png"]);
    dirs.populate("val", &["a.png", "b.png"]);
    dirs.populate("out", &["a.png"]);
    let before = (dirs.snapshot("train"), dirs.snapshot("val"), dirs.snapshot("out"));

    let fs = FaultyFs::new();
    let action = Action::Move {
        dest: dirs.path("out"),
    };
    let result = Reconciler::new(fs)
        .run(&match_job(&dirs, KeyMode::NameSize, action), true)
        .unwrap();

    let after = (dirs.snapshot("train"), dirs.snapshot("val"), dirs.snapshot("out"));
    assert_eq!(before, after);
    assert!(result.dry_run);
    assert_eq!((result.attempted, result.planned), (0, 2));

    let mut destinations: Vec<_> = result
        .outcomes
        .iter()
        .map(|o| o.destination.clone().unwrap())
        .collect();
    destinations.sort();
    assert_eq!(
        destinations,
        vec![dirs.path("out/a_1.png"), dirs.path("out/b.png")]
    );
    assert!(result.outcomes.iter().all(|o| o.reference.is_some()));
    assert!(result.outcomes.iter().all(|o| o.status == ActionStatus::Planned));
}

#[test]
fn test_dry_run_performs_no_mutations() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["a.png", "b.png"]);
    dirs.populate("val", &["a.png", "b.png"]);

    let reconciler = Reconciler::new(FaultyFs::new());
    let action = Action::Copy {
        dest: dirs.path("never-created"),
    };
    reconciler
        .run(&match_job(&dirs, KeyMode::Name, action), true)
        .unwrap();

    assert!(reconciler.fs().mutations().is_empty());
    dirs.assert_file_not_exists("never-created");
}

#[test]
fn test_dry_run_matches_real_run_names() {
    let preview = {
        let dirs = TestDirs::new();
        dirs.populate("train", &["x.png"]);
        dirs.populate("val", &["x.png"]);
        dirs.populate("out", &["x.png", "x_1.png"]);
        let action = Action::Move {
            dest: dirs.path("out"),
        };
        let result = Reconciler::new(LocalFs)
            .run(&match_job(&dirs, KeyMode::Name, action), true)
            .unwrap();
        result.outcomes[0]
            .destination
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    };

    let dirs = TestDirs::new();
    dirs.populate("train", &["x.png"]);
    dirs.populate("val", &["x.png"]);
    dirs.populate("out", &["x.png", "x_1.png"]);
    let action = Action::Move {
        dest: dirs.path("out"),
    };
    Reconciler::new(LocalFs)
        .run(&match_job(&dirs, KeyMode::Name, action), false)
        .unwrap();

    assert_eq!(preview.as_deref(), Some("x_2.png"));
    assert_eq!(dirs.names("out"), vec!["x.png", "x_1.png", "x_2.png"]);
}

#[test]
fn test_name_mode_preview_omits_reference() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["a.png"]);
    dirs.populate("val", &["a.png"]);

    let result = Reconciler::new(LocalFs)
        .run(&match_job(&dirs, KeyMode::Name, Action::Delete), true)
        .unwrap();

    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(result.outcomes[0].reference, None);
}

#[test]
fn test_failures_are_counted_and_processing_continues() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["a.png", "b.png", "c.png"]);
    dirs.populate("val", &["a.png", "b.png", "c.png"]);
    let fs = FaultyFs::new().failing(Op::Delete, "b.png");

    let result = Reconciler::new(fs)
        .run(&match_job(&dirs, KeyMode::Name, Action::Delete), false)
        .unwrap();

    assert_eq!((result.attempted, result.succeeded, result.failed), (3, 2, 1));
    let failed: Vec<_> = result.failures().map(|o| o.source.clone()).collect();
    assert_eq!(failed, vec![dirs.path("train/b.png")]);
    assert_eq!(dirs.names("train"), vec!["b.png"]);
}

#[test]
fn test_failed_move_does_not_stop_later_entries() {
    let dirs = TestDirs::new();
    let a = dirs.populate("a", &["x.png", "y.png"]);
    let out = dirs.dir("out");
    let fs = FaultyFs::new().failing(Op::Move, "x.png");

    let entries = scan_directory(&fs, &a, &KeyMode::Name).sorted_entries();
    let plan = recon_core::plan_by_positional_stride(&entries, 1).unwrap();
    let result = apply_action(&fs, &plan, &Action::Move { dest: out }, false);

    assert_eq!((result.succeeded, result.failed), (1, 1));
    assert!(matches!(result.outcomes[0].status, ActionStatus::Failed(_)));
    assert_eq!(dirs.names("out"), vec!["y.png"]);
}

#[test]
fn test_prune_deletes_orphans() {
    let dirs = TestDirs::new();
    dirs.populate("labels", &["1.txt", "2.txt", "3.txt"]);
    dirs.populate("images", &["2.txt"]);

    let job = JobSpec::Prune {
        target: dirs.path("labels"),
        reference: dirs.path("images"),
    };
    let reconciler = Reconciler::new(LocalFs);
    let prepared = reconciler.prepare(&job).unwrap();
    let result = reconciler.execute(&prepared, false);

    assert_eq!(result.succeeded, 2);
    assert_eq!(prepared.plan.unselected(), 1);
    assert_eq!(prepared.kept(), 1);
    assert_eq!(dirs.names("labels"), vec!["2.txt"]);
}

#[test]
fn test_split_moves_every_fifth_file() {
    let dirs = TestDirs::new();
    let names: Vec<String> = (1..=12).map(|i| format!("{i:02}.png")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    dirs.populate("all", &refs);

    let job = JobSpec::Split {
        source: dirs.path("all"),
        dest: dirs.path("val"),
        interval: 5,
        transfer: Transfer::Move,
    };
    let result = Reconciler::new(LocalFs).run(&job, false).unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(dirs.names("val"), vec!["05.png", "10.png"]);
    assert_eq!(dirs.names("all").len(), 10);
}

#[test]
fn test_split_copy_keeps_every_source_file() {
    let dirs = TestDirs::new();
    let names: Vec<String> = (1..=10).map(|i| format!("{i:02}.png")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    dirs.populate("all", &refs);

    let job = JobSpec::Split {
        source: dirs.path("all"),
        dest: dirs.path("val"),
        interval: 5,
        transfer: Transfer::Copy,
    };
    let reconciler = Reconciler::new(LocalFs);
    let prepared = reconciler.prepare(&job).unwrap();
    reconciler.execute(&prepared, false);

    assert_eq!(prepared.kept(), 10);
    assert_eq!(dirs.names("all").len(), prepared.kept());
}

#[test]
fn test_frames_copy_keeps_every_train_file_sharing_a_frame() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["frame_000004.png", "frame_000004.txt", "frame_000005.png"]);
    dirs.populate("val", &["frame_000004_png.rf.abc.jpg"]);

    let key = KeyMode::regex(recon_core::FRAME_PATTERN).unwrap();
    let action = Action::Copy {
        dest: dirs.path("out"),
    };
    let reconciler = Reconciler::new(LocalFs);
    let prepared = reconciler.prepare(&match_job(&dirs, key, action)).unwrap();
    let result = reconciler.execute(&prepared, false);

    assert_eq!(result.succeeded, 2);
    assert_eq!(dirs.names("out"), vec!["frame_000004.png", "frame_000004.txt"]);
    assert_eq!(prepared.plan.considered, 3);
    assert_eq!(prepared.kept(), 3);
}

#[test]
fn test_mirror_job_cannot_be_prepared() {
    let dirs = TestDirs::new();
    let job = JobSpec::Mirror {
        watched: dirs.dir("w"),
        target: dirs.dir("t"),
    };
    assert!(matches!(
        Reconciler::new(LocalFs).prepare(&job),
        Err(recon_core::Error::NotBatch { .. })
    ));
}

#[test]
fn test_empty_plan_reports_sample_keys() {
    let dirs = TestDirs::new();
    dirs.populate("train", &["frame_1.png", "frame_2.png"]);
    dirs.populate("val", &["img_1.png"]);

    let prepared = Reconciler::new(LocalFs)
        .prepare(&match_job(&dirs, KeyMode::Name, Action::Delete))
        .unwrap();

    assert!(prepared.plan.is_empty());
    let sample: Vec<_> = prepared.primary.sample_keys(3).into_iter().map(|k| k.to_string()).collect();
    assert_eq!(sample, vec!["frame_1.png", "frame_2.png"]);
}
