//! Resource group create/delete steps.

use crate::constants::{ARM_LOCATION, ARM_RESOURCE_GROUP_NAME};
use crate::operation::OperationStep;
use armstep_core::{ActionError, Operation, StateBag, StepName};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// The call that creates a resource group.
///
/// Implemented for plain closures `Fn(&str, &str) -> Result<(), ActionError>`
/// taking the resource group name, then the location.
#[async_trait]
pub trait ResourceGroupCreator: Send + Sync {
    async fn create(&self, resource_group_name: &str, location: &str) -> Result<(), ActionError>;
}

#[async_trait]
impl<F> ResourceGroupCreator for F
where
    F: Fn(&str, &str) -> Result<(), ActionError> + Send + Sync,
{
    async fn create(&self, resource_group_name: &str, location: &str) -> Result<(), ActionError> {
        self(resource_group_name, location)
    }
}

/// The call that deletes a resource group.
///
/// Implemented for plain closures `Fn(&str) -> Result<(), ActionError>`.
#[async_trait]
pub trait ResourceGroupDeleter: Send + Sync {
    async fn delete(&self, resource_group_name: &str) -> Result<(), ActionError>;
}

#[async_trait]
impl<F> ResourceGroupDeleter for F
where
    F: Fn(&str) -> Result<(), ActionError> + Send + Sync,
{
    async fn delete(&self, resource_group_name: &str) -> Result<(), ActionError> {
        self(resource_group_name)
    }
}

/// Arguments of [`CreateResourceGroup`], read from the state bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupSpec {
    pub name: String,
    pub location: String,
}

/// Creates the resource group named by `ArmResourceGroupName` in
/// `ArmLocation`. With a deleter registered, cleanup deletes it again.
pub struct CreateResourceGroup {
    create: Arc<dyn ResourceGroupCreator>,
    delete: Option<Arc<dyn ResourceGroupDeleter>>,
}

impl fmt::Debug for CreateResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateResourceGroup")
            .field("cleanup", &self.delete.is_some())
            .finish()
    }
}

#[async_trait]
impl Operation for CreateResourceGroup {
    type Args = ResourceGroupSpec;

    fn name(&self) -> StepName {
        StepName::new("StepCreateResourceGroup")
    }

    fn arguments(&self, bag: &StateBag) -> ResourceGroupSpec {
        ResourceGroupSpec {
            name: bag.get(ARM_RESOURCE_GROUP_NAME).clone(),
            location: bag.get(ARM_LOCATION).clone(),
        }
    }

    fn describe(&self, spec: &ResourceGroupSpec) -> String {
        format!(
            "Creating resource group '{}' in location '{}' ...",
            spec.name, spec.location
        )
    }

    async fn execute(&self, spec: &ResourceGroupSpec) -> Result<(), ActionError> {
        self.create.create(&spec.name, &spec.location).await
    }

    fn reverts(&self) -> bool {
        self.delete.is_some()
    }

    async fn revert(&self, spec: &ResourceGroupSpec) -> Result<(), ActionError> {
        match &self.delete {
            Some(delete) => delete.delete(&spec.name).await,
            None => Ok(()),
        }
    }
}

/// Deletes the resource group named by `ArmResourceGroupName`.
///
/// Deletion is terminal, so cleanup does nothing.
pub struct DeleteResourceGroup {
    delete: Arc<dyn ResourceGroupDeleter>,
}

impl fmt::Debug for DeleteResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleteResourceGroup").finish_non_exhaustive()
    }
}

#[async_trait]
impl Operation for DeleteResourceGroup {
    type Args = String;

    fn name(&self) -> StepName {
        StepName::new("StepDeleteResourceGroup")
    }

    fn arguments(&self, bag: &StateBag) -> String {
        bag.get(ARM_RESOURCE_GROUP_NAME).clone()
    }

    fn describe(&self, resource_group_name: &String) -> String {
        format!("Deleting resource group '{resource_group_name}' ...")
    }

    async fn execute(&self, resource_group_name: &String) -> Result<(), ActionError> {
        self.delete.delete(resource_group_name).await
    }
}

/// Step that creates a resource group.
pub type StepCreateResourceGroup = OperationStep<CreateResourceGroup>;

/// Step that deletes a resource group.
pub type StepDeleteResourceGroup = OperationStep<DeleteResourceGroup>;

impl StepCreateResourceGroup {
    pub fn new(create: impl ResourceGroupCreator + 'static) -> Self {
        Self::shared(Arc::new(create))
    }

    /// Builds the step around a collaborator shared with other steps.
    pub fn shared(create: Arc<dyn ResourceGroupCreator>) -> Self {
        OperationStep::from_operation(CreateResourceGroup {
            create,
            delete: None,
        })
    }

    /// Registers the deletion run by cleanup during teardown.
    pub fn with_cleanup(mut self, delete: impl ResourceGroupDeleter + 'static) -> Self {
        self.operation.delete = Some(Arc::new(delete));
        self
    }

    /// Like [`with_cleanup`](Self::with_cleanup) with a shared collaborator.
    pub fn with_shared_cleanup(mut self, delete: Arc<dyn ResourceGroupDeleter>) -> Self {
        self.operation.delete = Some(delete);
        self
    }
}

impl StepDeleteResourceGroup {
    pub fn new(delete: impl ResourceGroupDeleter + 'static) -> Self {
        Self::shared(Arc::new(delete))
    }

    pub fn shared(delete: Arc<dyn ResourceGroupDeleter>) -> Self {
        OperationStep::from_operation(DeleteResourceGroup { delete })
    }
}
