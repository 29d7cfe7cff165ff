//! Dataset preparation workflows spanning several jobs
//!
//! Each test chains the operations a dataset goes through: splitting off a
//! validation set, removing leakage, pruning orphaned labels, and keeping
//! labels in step with image deletions.

use recon_core::{
    Action, DeleteMirror, JobSpec, KeyMode, MirrorOutcome, NotifySource, Reconciler, Transfer,
    run_mirror,
};
use recon_fs::LocalFs;
use recon_test_utils::TestDirs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

fn frames(range: std::ops::RangeInclusive<u32>, ext: &str) -> Vec<String> {
    range.map(|i| format!("frame_{i:06}.{ext}")).collect()
}

fn populate_owned(dirs: &TestDirs, name: &str, files: &[String]) {
    let refs: Vec<&str> = files.iter().map(String::as_str).collect();
    dirs.populate(name, &refs);
}

// =============================================================================
// Split, then remove leakage, then prune labels
// =============================================================================

#[test]
fn test_split_dedupe_and_prune_labels() {
    let dirs = TestDirs::new();
    populate_owned(&dirs, "images", &frames(1..=20, "png"));
    populate_owned(&dirs, "labels", &frames(1..=20, "txt"));
    let reconciler = Reconciler::new(LocalFs);

    // 1. Copy every fifth image into a validation set
    let split = JobSpec::Split {
        source: dirs.path("images"),
        dest: dirs.path("val"),
        interval: 5,
        transfer: Transfer::Copy,
    };
    split.validate().unwrap();
    let result = reconciler.run(&split, false).unwrap();
    assert_eq!(result.succeeded, 4);

    // 2. Remove validation images from the training set
    let dedupe = JobSpec::Match {
        source: dirs.path("images"),
        reference: dirs.path("val"),
        key: KeyMode::NameSize,
        action: Action::Delete,
    };
    let result = reconciler.run(&dedupe, false).unwrap();
    assert_eq!(result.succeeded, 4);
    assert_eq!(dirs.names("images").len(), 16);

    // 3. Labels are matched by frame number, not by name
    let orphans = JobSpec::Match {
        source: dirs.path("labels"),
        reference: dirs.path("val"),
        key: KeyMode::regex(r"frame_(\d+)").unwrap(),
        action: Action::Move {
            dest: dirs.path("val_labels"),
        },
    };
    let result = reconciler.run(&orphans, false).unwrap();
    assert_eq!(result.succeeded, 4);
    assert_eq!(
        dirs.names("val_labels"),
        vec![
            "frame_000005.txt",
            "frame_000010.txt",
            "frame_000015.txt",
            "frame_000020.txt"
        ]
    );
    assert_eq!(dirs.names("labels").len(), 16);
}

#[test]
fn test_prune_after_manual_image_cleanup() {
    let dirs = TestDirs::new();
    populate_owned(&dirs, "images", &frames(1..=6, "png"));
    populate_owned(&dirs, "masks", &frames(1..=6, "png"));
    std::fs::remove_file(dirs.path("images/frame_000002.png")).unwrap();
    std::fs::remove_file(dirs.path("images/frame_000005.png")).unwrap();

    let prune = JobSpec::Prune {
        target: dirs.path("masks"),
        reference: dirs.path("images"),
    };
    let reconciler = Reconciler::new(LocalFs);
    let prepared = reconciler.prepare(&prune).unwrap();
    let result = reconciler.execute(&prepared, false);

    assert_eq!(result.succeeded, 2);
    assert_eq!(prepared.plan.unselected(), 4);
    assert_eq!(dirs.names("masks"), dirs.names("images"));
}

// =============================================================================
// Reactive mirror
// =============================================================================

#[test]
fn test_mirror_keeps_masks_in_step_with_images() {
    let dirs = TestDirs::new();
    populate_owned(&dirs, "images", &frames(1..=3, "png"));
    populate_owned(&dirs, "masks", &frames(1..=3, "png"));
    let images = dirs.path("images");

    let mut source = NotifySource::subscribe(&images).unwrap();
    let mirror = DeleteMirror::new(dirs.path("masks"));

    let deleter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        std::fs::remove_file(images.join("frame_000002.png")).unwrap();
    });

    let stop = Arc::new(AtomicBool::new(false));
    let watchdog = Arc::clone(&stop);
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(10));
        watchdog.store(true, Ordering::SeqCst);
    });

    let mut deleted = Vec::new();
    run_mirror(&LocalFs, &mut source, &mirror, &stop, |_, outcome| {
        if let MirrorOutcome::Deleted(path) = outcome {
            deleted.push(path.clone());
            stop.store(true, Ordering::SeqCst);
        }
    })
    .unwrap();
    drop(source);
    deleter.join().unwrap();

    assert_eq!(deleted, vec![dirs.path("masks/frame_000002.png")]);
    assert_eq!(dirs.names("masks"), dirs.names("images"));
}
