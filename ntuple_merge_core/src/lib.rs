//! ntuple merge core library
//!
//! Discovery, size accounting and orchestration for merging many small
//! `.root` files into one file per directory. The merge itself is delegated
//! to a [`MergeEngine`] backend.

pub mod discovery;
pub mod engine;
pub mod error;
pub mod observer;
pub mod orchestrator;
pub mod size;
pub mod units;

// Re-export main types
pub use discovery::{DiscoveredFile, Discovery, DiscoveryOptions, FileMatcher, MatchPolicy};
pub use engine::{
    ConcatEngine, EngineFactory, EngineKind, EngineSettings, HaddEngine, MergeEngine, OutputMode,
};
pub use error::{Error, Result};
pub use observer::{LogObserver, MergeEvent, MergeObserver, NullObserver};
pub use orchestrator::{
    DEFAULT_OUTPUT, DEFAULT_PATTERN, MergeOrchestrator, MergeOutcome, MergeReport, MergeRequest,
};
pub use size::{SizeEstimate, estimate_total_size};
