//! Testing utilities for plugin contexts.
//!
//! This module provides:
//! - Mock extensions and factories that count what they build
//! - Doubles for the checkpoint store, metadata cache and runtime source
//! - A wired-up pipeline fixture

mod fixtures;
mod mocks;

pub use fixtures::TestPipeline;
pub use mocks::{
    CountingFactory, FailingCheckpointStore, FixedRuntimeSource, MockExtension, StaticMetaCache,
};
