//! Turns an [`Operation`] into a [`Step`].

use crate::notify::Notifier;
use armstep_core::keys::ERROR;
use armstep_core::{
    ActionConfig, ActionError, Operation, Signal, StateBag, Step, StepFailure, StepName,
    WorkflowError,
};
use async_trait::async_trait;
use std::fmt;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A [`Step`] that sources its arguments, announces the call, invokes one
/// action and translates the result into Continue/Halt.
///
/// The arguments used for the call are kept so that `cleanup` reverts exactly
/// what was attempted. Retries and timeouts from the [`ActionConfig`] wrap the
/// action call itself.
pub struct OperationStep<O: Operation> {
    pub(crate) operation: O,
    notifier: Notifier,
    config: ActionConfig,
    attempted: Option<O::Args>,
}

impl<O: Operation> fmt::Debug for OperationStep<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationStep")
            .field("operation", &self.operation)
            .field("config", &self.config)
            .field("attempted", &self.attempted.is_some())
            .finish()
    }
}

impl<O: Operation> OperationStep<O> {
    pub fn from_operation(operation: O) -> Self {
        Self {
            operation,
            notifier: Notifier::default(),
            config: ActionConfig::default(),
            attempted: None,
        }
    }

    /// Replaces the `say`/`error` collaborators.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the retry and timeout limits for the action call.
    pub fn with_config(mut self, config: ActionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn operation(&self) -> &O {
        &self.operation
    }

    async fn invoke(&self, args: &O::Args) -> Result<(), ActionError> {
        let policy = &self.config.retry_policy;
        let max_retries = policy.max_retries();
        let mut attempt = 0;

        loop {
            let result = match self.config.timeout {
                Some(limit) => match timeout(limit, self.operation.execute(args)).await {
                    Ok(result) => result,
                    Err(_) => Err(WorkflowError::ActionTimeout {
                        step_name: self.operation.name(),
                        limit,
                    }
                    .into()),
                },
                None => self.operation.execute(args).await,
            };

            match result {
                Ok(()) => return Ok(()),
                Err(e) if attempt < max_retries => {
                    info!(
                        "Step '{}' action failed ({}), retrying ({}/{})",
                        self.operation.name(),
                        e,
                        attempt + 1,
                        max_retries
                    );
                    if let Some(delay) = policy.delay_for_attempt(attempt) {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<O: Operation> Step for OperationStep<O> {
    fn name(&self) -> StepName {
        self.operation.name()
    }

    async fn run(&mut self, bag: &mut StateBag) -> Signal {
        let args = self.operation.arguments(bag);
        self.notifier.say(&self.operation.describe(&args));

        let result = self.invoke(&args).await;
        self.attempted = Some(args);

        match result {
            Ok(()) => Signal::Continue,
            Err(e) => {
                warn!("Step '{}' action failed: {:#}", self.operation.name(), e);
                self.notifier.error(&e);
                bag.put(ERROR, StepFailure::new(self.operation.name(), e));
                Signal::Halt
            }
        }
    }

    async fn cleanup(&mut self, _bag: &mut StateBag) {
        let Some(args) = self.attempted.take() else {
            debug!("Nothing to clean up for step '{}'", self.operation.name());
            return;
        };
        if !self.operation.reverts() {
            return;
        }
        if let Err(e) = self.operation.revert(&args).await {
            warn!("Step '{}' cleanup failed: {:#}", self.operation.name(), e);
            self.notifier.error(&e);
        }
    }
}
