//! Command line workflow
//!
//! - `orchestration` - the release pipeline, independent of argument parsing

pub mod orchestration;

pub use orchestration::{run_sync_workflow, SyncOutcome};
