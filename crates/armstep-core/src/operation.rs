//! The "source arguments, call one action" contract shared by concrete steps.

use crate::context::StateBag;
use crate::error::ActionError;
use crate::step::StepName;
use async_trait::async_trait;

/// A single side-effecting action whose arguments come from the state bag.
///
/// Implementations declare how to read their arguments, how to describe the
/// call to a human, how to perform it and, optionally, how to undo it. The
/// engine crate wraps an `Operation` into a [`Step`](crate::Step) that owns the
/// Continue/Halt protocol, so each resource kind only supplies this part.
///
/// # Examples
///
/// ```
/// use armstep_core::{ActionError, Operation, StateBag, StateKey, StepName};
/// use async_trait::async_trait;
///
/// const VM_NAME: StateKey<String> = StateKey::new("VmName");
///
/// #[derive(Debug)]
/// struct StopVm;
///
/// #[async_trait]
/// impl Operation for StopVm {
///     type Args = String;
///
///     fn name(&self) -> StepName {
///         StepName::new("StopVm")
///     }
///
///     fn arguments(&self, bag: &StateBag) -> String {
///         bag.get(VM_NAME).clone()
///     }
///
///     fn describe(&self, vm: &String) -> String {
///         format!("Stopping virtual machine '{vm}'")
///     }
///
///     async fn execute(&self, _vm: &String) -> Result<(), ActionError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Operation: Send + Sync + std::fmt::Debug {
    /// Arguments sourced from the state bag.
    type Args: Send + Sync;

    /// Name of the step built from this operation.
    fn name(&self) -> StepName;

    /// Reads the required arguments.
    ///
    /// Uses [`StateBag::get`] for declared inputs, so a missing input panics.
    fn arguments(&self, bag: &StateBag) -> Self::Args;

    /// Human-readable description announced before the call.
    fn describe(&self, args: &Self::Args) -> String;

    /// Performs the action.
    async fn execute(&self, args: &Self::Args) -> Result<(), ActionError>;

    /// Whether [`revert`](Operation::revert) has anything to undo.
    fn reverts(&self) -> bool {
        false
    }

    /// Undoes the action for the arguments it was attempted with.
    ///
    /// Called even when `execute` failed, since a partially applied action
    /// may still need reversal.
    async fn revert(&self, _args: &Self::Args) -> Result<(), ActionError> {
        Ok(())
    }
}
