//! A sequential provisioning step runner.
//!
//! Steps run one after another against a shared [`StateBag`]. The first step
//! to fail records its error under `Error`, halts the pipeline, and the
//! runner cleans up every step that ran, last to first.
//!
//! # Example
//!
//! ```rust
//! use armstep::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = ArmConfig::new("westus", "packer-build-rg");
//! let mut bag = StateBag::new();
//! config.seed(&mut bag);
//!
//! let create = |_name: &str, _location: &str| -> Result<(), ActionError> { Ok(()) };
//! let delete = |_name: &str| -> Result<(), ActionError> { Ok(()) };
//!
//! let mut runner = Runner::builder()
//!     .step(
//!         StepCreateResourceGroup::new(create)
//!             .with_cleanup(delete)
//!             .with_config(config.action_config()),
//!     )
//!     .teardown(config.teardown())
//!     .build()
//!     .expect("valid pipeline");
//!
//! runner.run(&mut bag).await.expect("pipeline failed");
//! assert!(bag.get_ok(ERROR).is_none());
//! # }
//! ```

mod config;
pub mod constants;
mod notify;
mod operation;
mod resource_group;
mod runner;

// Re-export core types
pub use armstep_core::*;

pub use config::ArmConfig;
pub use notify::Notifier;
pub use operation::OperationStep;
pub use resource_group::{
    CreateResourceGroup, DeleteResourceGroup, ResourceGroupCreator, ResourceGroupDeleter,
    ResourceGroupSpec, StepCreateResourceGroup, StepDeleteResourceGroup,
};
pub use runner::{RunState, Runner, RunnerBuilder, TeardownPolicy};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::constants::{ARM_LOCATION, ARM_RESOURCE_GROUP_NAME, ERROR, HALTED};
    pub use crate::{
        ActionConfig, ActionError, ArmConfig, Notifier, Operation, OperationStep,
        ResourceGroupCreator, ResourceGroupDeleter, RetryPolicy, RunState, Runner, Signal,
        StateBag, StateKey, Step, StepCreateResourceGroup, StepDeleteResourceGroup, StepFailure,
        StepName, TeardownPolicy, WorkflowError,
    };
}
