//! Sequential runner with reverse-order teardown.

use armstep_core::keys::HALTED;
use armstep_core::{Signal, StateBag, Step, StepName, WorkflowError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Where a runner is in its single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    /// Executing the step at this index.
    Running(usize),
    /// A step halted; teardown is in progress.
    Halted,
    /// Terminal. Reached after the last step continues or after teardown.
    Completed,
}

/// When the runner invokes `cleanup` on the steps that ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownPolicy {
    /// Only after a step halts.
    #[default]
    OnHalt,
    /// After every run, including successful ones.
    Always,
}

/// Runs an ordered sequence of steps against a [`StateBag`].
///
/// A runner executes once. The first step to return [`Signal::Halt`] stops
/// the pipeline; the runner then calls `cleanup` on every step whose `run` was
/// invoked, the halting one included, last to first.
pub struct Runner {
    steps: Vec<Box<dyn Step>>,
    teardown: TeardownPolicy,
    state: RunState,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("steps", &self.step_names())
            .field("teardown", &self.teardown)
            .field("state", &self.state)
            .finish()
    }
}

impl Runner {
    /// Creates a new runner builder.
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn teardown_policy(&self) -> TeardownPolicy {
        self.teardown
    }

    /// Returns the step names in execution order.
    pub fn step_names(&self) -> Vec<StepName> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Executes the steps in order.
    ///
    /// On a halt, `Halted` is set in the bag, teardown runs and
    /// [`WorkflowError::Halted`] is returned. The failure itself stays in the
    /// bag under `Error`.
    pub async fn run(&mut self, bag: &mut StateBag) -> Result<(), WorkflowError> {
        if self.state != RunState::NotStarted {
            return Err(WorkflowError::AlreadyRun);
        }

        let total = self.steps.len();
        let mut executed = 0;
        let mut halted_at = None;

        for (index, step) in self.steps.iter_mut().enumerate() {
            self.state = RunState::Running(index);
            debug!("Running step '{}' ({}/{})", step.name(), index + 1, total);
            let signal = step.run(bag).await;
            executed = index + 1;

            match signal {
                Signal::Continue => {
                    info!("Step '{}' completed successfully", step.name());
                }
                Signal::Halt => {
                    warn!("Step '{}' halted the pipeline", step.name());
                    halted_at = Some(step.name());
                    break;
                }
            }
        }

        let result = match halted_at {
            Some(step_name) => {
                self.state = RunState::Halted;
                bag.put(HALTED, true);
                self.tear_down(executed, bag).await;
                Err(WorkflowError::Halted { step_name })
            }
            None => {
                if self.teardown == TeardownPolicy::Always {
                    self.tear_down(executed, bag).await;
                }
                Ok(())
            }
        };

        self.state = RunState::Completed;
        info!(
            "Pipeline finished in {:?} ({} of {} steps ran)",
            bag.elapsed(),
            executed,
            total
        );
        result
    }

    async fn tear_down(&mut self, executed: usize, bag: &mut StateBag) {
        for step in self.steps[..executed].iter_mut().rev() {
            debug!("Cleaning up step '{}'", step.name());
            step.cleanup(bag).await;
        }
    }
}

/// Builder for constructing [`Runner`] instances.
#[derive(Default)]
pub struct RunnerBuilder {
    steps: Vec<Box<dyn Step>>,
    teardown: TeardownPolicy,
}

impl RunnerBuilder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            teardown: TeardownPolicy::default(),
        }
    }

    /// Appends a step.
    pub fn step<S: Step + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Appends an already boxed step.
    pub fn boxed_step(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn teardown(mut self, policy: TeardownPolicy) -> Self {
        self.teardown = policy;
        self
    }

    /// Builds the runner.
    pub fn build(self) -> Result<Runner, WorkflowError> {
        if self.steps.is_empty() {
            return Err(WorkflowError::Configuration(
                "At least one step must be added".to_string(),
            ));
        }

        Ok(Runner {
            steps: self.steps,
            teardown: self.teardown,
            state: RunState::NotStarted,
        })
    }
}
