//! Merge observation abstractions
//!
//! The orchestrator reports every stage through a [`MergeObserver`] instead of
//! writing to a global logger, so the CLI decides how events are rendered and
//! tests can record them.

use crate::units::{format_elapsed, gigabytes, kilobytes, signed_kilobytes};
use std::path::PathBuf;
use std::time::Duration;

const SEPARATOR: &str = "-------------------------------------------------------------------------";

/// Core trait for merge observation
pub trait MergeObserver: Send + Sync {
    /// Report a stage event
    fn report(&self, event: MergeEvent);
}

/// Events emitted while a merge runs, in stage order
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent {
    /// Discovery is starting under `base_dir`
    DiscoveryStarted { base_dir: PathBuf },

    /// A walked directory contained matching files
    DirectoryMatched { directory: PathBuf, count: usize },

    /// A directory entry could not be read during discovery
    EntrySkipped { path: Option<PathBuf>, error: String },

    /// The on-disk size of a discovered file
    FileSized { path: PathBuf, bytes: u64 },

    /// A discovered file could not be stat'ed
    SizeUnavailable { path: PathBuf, error: String },

    /// Sum of all file sizes that could be read
    EstimateComplete { total_bytes: u64 },

    /// A file was handed to the merge engine
    InputQueued { path: PathBuf },

    /// The merge engine is about to run
    MergeStarted { engine: String, inputs: usize },

    /// The merge engine reported success
    MergeSucceeded,

    /// The merge engine reported failure
    MergeFailed { reason: String },

    /// Size of the merged output compared with the estimate
    OutputSized {
        path: PathBuf,
        bytes: u64,
        delta: i64,
    },

    /// The merged output could not be stat'ed
    OutputSizeUnavailable { path: PathBuf, error: String },

    /// Wall-clock time for the whole run
    Finished { elapsed: Duration, success: bool },
}

/// Null implementation for when no observation is needed
pub struct NullObserver;

impl MergeObserver for NullObserver {
    fn report(&self, _event: MergeEvent) {}
}

/// Observer that renders events through the `log` facade
pub struct LogObserver;

impl MergeObserver for LogObserver {
    fn report(&self, event: MergeEvent) {
        match event {
            MergeEvent::DiscoveryStarted { base_dir } => {
                log::info!("Collecting .root files from '{}'.", base_dir.display());
            }
            MergeEvent::DirectoryMatched { directory, count } => {
                log::info!("{SEPARATOR}");
                log::info!(
                    "There are {count} .root files in directory '{}'.",
                    directory.display()
                );
                log::info!("{SEPARATOR}");
            }
            MergeEvent::EntrySkipped { path, error } => match path {
                Some(path) => log::warn!("Skipping '{}': {error}", path.display()),
                None => log::warn!("Skipping unreadable entry: {error}"),
            },
            MergeEvent::FileSized { path, bytes } => {
                log::info!(
                    "The size of file '{}' is {:.2} KB.",
                    path.display(),
                    kilobytes(bytes)
                );
                log::info!(
                    "The size of file '{}' is {:.2} GB.",
                    path.display(),
                    gigabytes(bytes)
                );
            }
            MergeEvent::SizeUnavailable { path, error } => {
                log::warn!("Failed to get size for file '{}': {error}", path.display());
            }
            MergeEvent::EstimateComplete { total_bytes } => {
                log::info!("{SEPARATOR}");
                log::info!(
                    "Estimated total size before merging is {:.2} KB.",
                    kilobytes(total_bytes)
                );
                log::info!(
                    "Estimated total size before merging is {:.2} GB.",
                    gigabytes(total_bytes)
                );
                log::info!("{SEPARATOR}");
            }
            MergeEvent::InputQueued { path } => {
                log::info!("Added file '{}' to the merge list.", path.display());
            }
            MergeEvent::MergeStarted { engine, inputs } => {
                log::info!("Starting the merge process ({engine}, {inputs} inputs).");
            }
            MergeEvent::MergeSucceeded => {
                log::info!("The merge process completed successfully.");
            }
            MergeEvent::MergeFailed { reason } => {
                log::error!("The merge process failed! {reason}");
                log::error!("The overall merge process failed.");
            }
            MergeEvent::OutputSized { path, bytes, delta } => {
                log::info!("{SEPARATOR}");
                log::info!(
                    "The merged file '{}' has a size of {:.2} KB.",
                    path.display(),
                    kilobytes(bytes)
                );
                log::info!(
                    "The difference between the estimated and merged file size is {:.2} KB ({delta} bytes).",
                    signed_kilobytes(delta)
                );
            }
            MergeEvent::OutputSizeUnavailable { path, error } => {
                log::info!("{SEPARATOR}");
                log::warn!(
                    "Failed to obtain the size of the merged file '{}': {error}",
                    path.display()
                );
            }
            MergeEvent::Finished { elapsed, .. } => {
                log::info!("The merge job completed in {}.", format_elapsed(elapsed));
                log::info!("{SEPARATOR}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_observer_accepts_every_event() {
        let observer = NullObserver;
        observer.report(MergeEvent::MergeSucceeded);
        observer.report(MergeEvent::EstimateComplete { total_bytes: 10 });
    }

    #[test]
    fn test_observer_is_object_safe() {
        let observers: Vec<Box<dyn MergeObserver>> =
            vec![Box::new(NullObserver), Box::new(LogObserver)];
        for observer in &observers {
            observer.report(MergeEvent::Finished {
                elapsed: Duration::from_secs(1),
                success: true,
            });
        }
    }
}
