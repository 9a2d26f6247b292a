//! Merge engine error types

use thiserror::Error;

/// Errors raised by merge engine backends
#[derive(Error, Debug)]
pub enum MergeError {
    /// `merge` was called before an output path was set
    #[error("Merge engine '{engine}' has no output file configured")]
    OutputNotConfigured { engine: String },

    /// The backend process could not be started
    #[error("Failed to launch merge engine '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend ran and reported failure
    #[error("Merge engine '{engine}' reported failure: {status}")]
    EngineFailed { engine: String, status: String },
}

impl MergeError {
    /// Create an output-not-configured error
    pub fn output_not_configured(engine: &str) -> Self {
        Self::OutputNotConfigured {
            engine: engine.to_string(),
        }
    }

    /// Create a launch error
    pub fn launch(program: &str, source: std::io::Error) -> Self {
        Self::Launch {
            program: program.to_string(),
            source,
        }
    }

    /// Create an engine failure error
    pub fn engine_failed(engine: &str, status: &str) -> Self {
        Self::EngineFailed {
            engine: engine.to_string(),
            status: status.to_string(),
        }
    }
}
