//! End-to-end tests for the merge orchestrator
//!
//! These run every stage against real temporary directories with a stub
//! engine standing in for the merge backend.

use ntuple_merge_core::error::ValidationError;
use ntuple_merge_core::{
    ConcatEngine, DiscoveryOptions, Error, MatchPolicy, MergeEvent, MergeOrchestrator,
    MergeOutcome, MergeRequest, OutputMode,
};
use ntuple_merge_test_utils::{RecordingObserver, StorageTreeBuilder, StubBehavior, StubEngine};
use std::path::PathBuf;
use std::sync::Arc;

fn orchestrator() -> (MergeOrchestrator, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    (MergeOrchestrator::new(observer.clone()), observer)
}

#[test]
fn test_reports_negative_size_delta() {
    let tree = StorageTreeBuilder::new()
        .with_file("run/out_1.root", 1000)
        .with_file("run/out_2.root", 1000)
        .build();
    let output = tree.path().join("run.root");
    let request = MergeRequest::new(tree.path().join("run"), "out_*.root", &output);

    let (orchestrator, observer) = orchestrator();
    let mut engine = StubEngine::writing(1900);
    let report = orchestrator.run(&request, &mut engine).unwrap();

    assert_eq!(report.files_discovered, 2);
    assert_eq!(report.estimated_bytes, 2000);
    assert_eq!(
        report.outcome,
        MergeOutcome::Succeeded {
            final_bytes: Some(1900),
            size_delta: Some(-100),
        }
    );
    assert!(observer.saw(|e| matches!(e, MergeEvent::OutputSized { delta: -100, .. })));
}

#[test]
fn test_failed_merge_skips_compare() {
    let tree = StorageTreeBuilder::new()
        .with_outputs("run", 3, 64)
        .build();
    let request = MergeRequest::new(
        tree.path().join("run"),
        "out_*.root",
        tree.path().join("run.root"),
    );

    let (orchestrator, observer) = orchestrator();
    let mut engine = StubEngine::failing("disk quota exceeded");
    let report = orchestrator.run(&request, &mut engine).unwrap();

    assert!(!report.is_success());
    assert!(matches!(
        report.outcome,
        MergeOutcome::Failed { ref reason } if reason.contains("disk quota exceeded")
    ));
    assert_eq!(engine.merge_calls(), 1);
    assert!(!observer.saw(|e| matches!(
        e,
        MergeEvent::OutputSized { .. } | MergeEvent::OutputSizeUnavailable { .. }
    )));
    assert!(observer.saw(|e| matches!(e, MergeEvent::Finished { success: false, .. })));
}

#[test]
fn test_engine_receives_inputs_in_discovery_order() {
    let tree = StorageTreeBuilder::new()
        .with_file("run/out_2.root", 10)
        .with_file("run/out_1.root", 10)
        .with_file("run/sub/out_3.root", 10)
        .with_file("run/skip.dat", 10)
        .build();
    let run = tree.path().join("run");
    let output = tree.path().join("run.root");
    let request = MergeRequest::new(&run, "out_*.root", &output);

    let (orchestrator, _observer) = orchestrator();
    let mut engine = StubEngine::writing(30);
    orchestrator.run(&request, &mut engine).unwrap();

    let expected: Vec<PathBuf> = vec![
        run.join("out_1.root"),
        run.join("out_2.root"),
        run.join("sub/out_3.root"),
    ];
    assert_eq!(engine.inputs(), expected.as_slice());
    assert_eq!(engine.output(), Some(output.as_path()));
}

#[test]
fn test_substring_policy_includes_prefixed_names() {
    let tree = StorageTreeBuilder::new()
        .with_file("run/out_1.root", 5)
        .with_file("run/notout_1.root", 7)
        .build();
    let request = MergeRequest::new(
        tree.path().join("run"),
        "out_*.root",
        tree.path().join("run.root"),
    );

    let (orchestrator, _observer) = orchestrator();
    let mut engine = StubEngine::writing(12);
    let report = orchestrator.run(&request, &mut engine).unwrap();

    // notout_1.root contains the literal prefix "out_" and is merged too
    assert_eq!(report.files_discovered, 2);
    assert_eq!(report.estimated_bytes, 12);
}

#[test]
fn test_glob_policy_excludes_prefixed_names() {
    let tree = StorageTreeBuilder::new()
        .with_file("run/out_1.root", 5)
        .with_file("run/notout_1.root", 7)
        .build();
    let request = MergeRequest::new(
        tree.path().join("run"),
        "out_*.root",
        tree.path().join("run.root"),
    )
    .with_policy(MatchPolicy::Glob);

    let (orchestrator, _observer) = orchestrator();
    let mut engine = StubEngine::writing(5);
    let report = orchestrator.run(&request, &mut engine).unwrap();

    assert_eq!(report.files_discovered, 1);
}

#[test]
fn test_missing_output_after_success_is_absent_size() {
    let tree = StorageTreeBuilder::new().with_outputs("run", 1, 8).build();
    let request = MergeRequest::new(
        tree.path().join("run"),
        "out_*.root",
        tree.path().join("run.root"),
    );

    let (orchestrator, observer) = orchestrator();
    let mut engine = StubEngine::new(StubBehavior::SucceedWithoutOutput);
    let report = orchestrator.run(&request, &mut engine).unwrap();

    assert_eq!(
        report.outcome,
        MergeOutcome::Succeeded {
            final_bytes: None,
            size_delta: None,
        }
    );
    assert!(observer.saw(|e| matches!(e, MergeEvent::OutputSizeUnavailable { .. })));
}

#[test]
fn test_empty_directory_still_merges() {
    let tree = StorageTreeBuilder::new().with_dir("empty").build();
    let output = tree.path().join("empty.root");
    let request = MergeRequest::new(tree.path().join("empty"), "out_*.root", &output);

    let (orchestrator, _observer) = orchestrator();
    let mut engine = ConcatEngine::new(OutputMode::Overwrite);
    let report = orchestrator.run(&request, &mut engine).unwrap();

    assert_eq!(report.files_discovered, 0);
    assert!(report.is_success());
    assert!(output.exists());
}

#[test]
fn test_missing_base_dir_is_an_error() {
    let tree = StorageTreeBuilder::new().build();
    let request = MergeRequest::new(
        tree.path().join("nope"),
        "out_*.root",
        tree.path().join("nope.root"),
    );

    let (orchestrator, observer) = orchestrator();
    let mut engine = StubEngine::writing(0);

    assert!(orchestrator.run(&request, &mut engine).is_err());
    assert_eq!(engine.merge_calls(), 0);
    assert!(observer.events().is_empty());
}

#[test]
fn test_empty_output_path_is_rejected_before_discovery() {
    let tree = StorageTreeBuilder::new().with_outputs("run", 1, 8).build();
    let request = MergeRequest::new(tree.path().join("run"), "out_*.root", "");

    let (orchestrator, observer) = orchestrator();
    let mut engine = StubEngine::writing(8);

    let error = orchestrator.run(&request, &mut engine).unwrap_err();
    assert!(matches!(
        error,
        Error::Validation(ValidationError::InvalidParameter { ref parameter, .. })
            if parameter == "output"
    ));
    assert_eq!(engine.merge_calls(), 0);
    assert!(observer.events().is_empty());
}

#[test]
fn test_directory_counts_are_reported_during_the_walk() {
    let tree = StorageTreeBuilder::new()
        .with_file("run/out_1.root", 4)
        .with_file("run/out_2.root", 4)
        .with_dir("run/a")
        .with_file("run/b/out_3.root", 4)
        .build();
    let run = tree.path().join("run");

    let request = MergeRequest::new(&run, "out_*.root", tree.path().join("run.root"));
    let (orchestrator, observer) = orchestrator();
    orchestrator.discover(&request).unwrap();

    let matched: Vec<(PathBuf, usize)> = observer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            MergeEvent::DirectoryMatched { directory, count } => Some((directory, count)),
            _ => None,
        })
        .collect();
    assert_eq!(matched, vec![(run.clone(), 2), (run.join("b"), 1)]);
}

#[cfg(unix)]
#[test]
fn test_directory_count_precedes_later_skipped_entries() {
    let tree = StorageTreeBuilder::new()
        .with_file("run/out_1.root", 4)
        .with_dir("run/a")
        .with_file("run/b/out_2.root", 4)
        .build();
    let run = tree.path().join("run");
    std::os::unix::fs::symlink(run.join("a/missing"), run.join("a/dangling")).unwrap();

    let request = MergeRequest::new(&run, "out_*.root", tree.path().join("run.root"))
        .with_discovery(DiscoveryOptions::new().with_follow_links(true));
    let (orchestrator, observer) = orchestrator();
    orchestrator.discover(&request).unwrap();

    let kinds: Vec<&str> = observer
        .events()
        .iter()
        .map(|e| match e {
            MergeEvent::DiscoveryStarted { .. } => "started",
            MergeEvent::DirectoryMatched { .. } => "matched",
            MergeEvent::EntrySkipped { .. } => "skipped",
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(kinds, vec!["started", "matched", "skipped", "matched"]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_base_dir_is_skipped_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let tree = StorageTreeBuilder::new().with_outputs("run", 1, 4).build();
    let run = tree.path().join("run");
    std::fs::set_permissions(&run, std::fs::Permissions::from_mode(0o000)).unwrap();
    if std::fs::read_dir(&run).is_ok() {
        // Privileged users read through the mode bits
        std::fs::set_permissions(&run, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let request = MergeRequest::new(&run, "out_*.root", tree.path().join("run.root"));
    let (orchestrator, observer) = orchestrator();
    let discovery = orchestrator.discover(&request);
    std::fs::set_permissions(&run, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(discovery.unwrap().is_empty());
    assert!(observer.saw(|e| matches!(
        e,
        MergeEvent::EntrySkipped { path: Some(path), .. } if *path == run
    )));
}

#[test]
fn test_stage_events_arrive_in_order() {
    let tree = StorageTreeBuilder::new().with_outputs("run", 2, 16).build();
    let request = MergeRequest::new(
        tree.path().join("run"),
        "out_*.root",
        tree.path().join("run.root"),
    );

    let (orchestrator, observer) = orchestrator();
    let mut engine = ConcatEngine::new(OutputMode::Overwrite);
    orchestrator.run(&request, &mut engine).unwrap();

    let stage = |event: &MergeEvent| -> u8 {
        match event {
            MergeEvent::DiscoveryStarted { .. } | MergeEvent::DirectoryMatched { .. } => 0,
            MergeEvent::FileSized { .. } | MergeEvent::EstimateComplete { .. } => 1,
            MergeEvent::InputQueued { .. }
            | MergeEvent::MergeStarted { .. }
            | MergeEvent::MergeSucceeded => 2,
            MergeEvent::OutputSized { .. } => 3,
            MergeEvent::Finished { .. } => 4,
            other => panic!("unexpected event {other:?}"),
        }
    };
    let stages: Vec<u8> = observer.events().iter().map(stage).collect();

    let mut sorted = stages.clone();
    sorted.sort();
    assert_eq!(stages, sorted);
    assert_eq!(stages.last(), Some(&4));
}

#[test]
fn test_concat_engine_end_to_end_has_zero_delta() {
    let tree = StorageTreeBuilder::new()
        .with_file("run/out_1.root", 300)
        .with_file("run/out_2.root", 700)
        .build();
    let request = MergeRequest::new(
        tree.path().join("run"),
        "out_*.root",
        tree.path().join("run.root"),
    );

    let (orchestrator, _observer) = orchestrator();
    let mut engine = ConcatEngine::new(OutputMode::Overwrite);
    let report = orchestrator.run(&request, &mut engine).unwrap();

    assert_eq!(
        report.outcome,
        MergeOutcome::Succeeded {
            final_bytes: Some(1000),
            size_delta: Some(0),
        }
    );
}
