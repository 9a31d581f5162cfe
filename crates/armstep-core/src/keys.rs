//! State bag keys written by the engine itself.

use crate::context::StateKey;
use crate::error::StepFailure;

/// The first action failure of the run.
pub const ERROR: StateKey<StepFailure> = StateKey::new("Error");

/// Set to `true` by the runner when a step halts the pipeline.
pub const HALTED: StateKey<bool> = StateKey::new("Halted");
