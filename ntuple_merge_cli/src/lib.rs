//! ntuple-merge command line interface
//!
//! Configuration, logging, job descriptor generation and report output for
//! the `ntuple-merge` binary.

pub mod config;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod output;
