//! Error types for step execution.

use crate::step::StepName;
use std::time::Duration;
use thiserror::Error;

/// Opaque failure returned by an action collaborator.
///
/// The engine never classifies these; it only cares whether one occurred.
pub type ActionError = anyhow::Error;

/// The failure a step records under [`ERROR`](crate::keys::ERROR) when its
/// action fails.
#[derive(Error, Debug)]
#[error("Step '{step_name}' failed: {source}")]
pub struct StepFailure {
    /// The step whose action failed.
    pub step_name: StepName,
    /// The error returned by the action collaborator.
    #[source]
    pub source: ActionError,
}

impl StepFailure {
    pub fn new(step_name: StepName, source: ActionError) -> Self {
        Self { step_name, source }
    }
}

/// Errors reported by the runner and its configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WorkflowError {
    /// A step returned `Halt`; teardown has already run.
    #[error("Pipeline halted at step '{step_name}'")]
    Halted {
        /// The step that halted the pipeline.
        step_name: StepName,
    },

    /// `run` was called on a runner that has already executed.
    #[error("Runner has already executed; build a new runner for another run")]
    AlreadyRun,

    /// The pipeline or step configuration is invalid.
    #[error("Invalid pipeline configuration: {0}")]
    Configuration(String),

    /// An action call exceeded its time limit.
    #[error("Action in step '{step_name}' timed out after {limit:?}")]
    ActionTimeout {
        /// The step whose action timed out.
        step_name: StepName,
        /// The configured limit.
        limit: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_error_display() {
        let error = WorkflowError::Halted {
            step_name: StepName::new("StepCreateResourceGroup"),
        };
        assert_eq!(
            error.to_string(),
            "Pipeline halted at step 'StepCreateResourceGroup'"
        );

        let error = WorkflowError::ActionTimeout {
            step_name: StepName::new("StepDeleteResourceGroup"),
            limit: Duration::from_millis(50),
        };
        assert_eq!(
            error.to_string(),
            "Action in step 'StepDeleteResourceGroup' timed out after 50ms"
        );
    }

    #[test]
    fn test_step_failure_keeps_source() {
        let failure = StepFailure::new(StepName::new("create"), anyhow!("quota exceeded"));
        assert_eq!(failure.to_string(), "Step 'create' failed: quota exceeded");

        let source = std::error::Error::source(&failure).map(|e| e.to_string());
        assert_eq!(source.as_deref(), Some("quota exceeded"));
    }
}
