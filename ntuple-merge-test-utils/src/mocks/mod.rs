//! Mock implementations for testing

mod engine;
mod observer;

pub use engine::{StubBehavior, StubEngine};
pub use observer::RecordingObserver;
