//! Test utilities for ntuple-merge
//!
//! This crate provides a stub merge engine, a recording observer and a
//! storage tree builder for testing merge and job generation.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::StorageTreeBuilder;
pub use mocks::{RecordingObserver, StubBehavior, StubEngine};
