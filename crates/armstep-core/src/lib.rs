//! Core traits and types for the armstep step runner.
//!
//! This crate provides the runtime-free abstractions. Crates that contribute
//! their own steps should depend on this crate only.
//!
//! # Core Types
//!
//! - [`StateBag`] / [`StateKey`] - Typed per-run state shared by all steps
//! - [`Step`] - A unit of work with a rollback, returning a [`Signal`]
//! - [`Operation`] - Argument sourcing plus one action, the shape every
//!   provisioning step shares
//! - [`ActionConfig`] / [`RetryPolicy`] - Limits applied around an action call
//! - [`StepFailure`] / [`WorkflowError`] - Error types

mod context;
mod error;
pub mod keys;
mod operation;
mod policy;
mod step;

pub use context::{StateBag, StateKey};
pub use error::{ActionError, StepFailure, WorkflowError};
pub use operation::Operation;
pub use policy::{ActionConfig, RetryPolicy, RetryPolicyError};
pub use step::{Signal, Step, StepName};
