//! Resource group build with a failing middle step.
//!
//! This example demonstrates:
//! 1. Seeding the state bag from an `ArmConfig`
//! 2. Sharing one API client between the create, cleanup and delete calls
//! 3. Reverse-order teardown after a halt
//!
//! The default notifier prints `say`/`error` through the tracing subscriber.

use armstep::prelude::*;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Stand-in for the resource manager API
#[derive(Debug, Default)]
struct SimulatedArm {
    groups: Mutex<HashSet<String>>,
}

#[async_trait]
impl ResourceGroupCreator for SimulatedArm {
    async fn create(&self, resource_group_name: &str, location: &str) -> Result<(), ActionError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        println!("  [arm] PUT resourcegroups/{resource_group_name} (location={location})");
        if let Ok(mut groups) = self.groups.lock() {
            groups.insert(resource_group_name.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceGroupDeleter for SimulatedArm {
    async fn delete(&self, resource_group_name: &str) -> Result<(), ActionError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        println!("  [arm] DELETE resourcegroups/{resource_group_name}");
        let removed = match self.groups.lock() {
            Ok(mut groups) => groups.remove(resource_group_name),
            Err(_) => false,
        };
        if removed {
            Ok(())
        } else {
            Err(anyhow::anyhow!("resource group {resource_group_name} not found"))
        }
    }
}

// Step 2: a deployment that fails validation
#[derive(Debug)]
struct DeployTemplate;

#[async_trait]
impl Step for DeployTemplate {
    fn name(&self) -> StepName {
        StepName::new("DeployTemplate")
    }

    async fn run(&mut self, bag: &mut StateBag) -> Signal {
        let group = bag.get(ARM_RESOURCE_GROUP_NAME).clone();
        println!("Deploying template into '{group}' ...");
        bag.put(
            ERROR,
            StepFailure::new(self.name(), anyhow::anyhow!("InvalidTemplate: missing vmSize")),
        );
        Signal::Halt
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config: ArmConfig = serde_json::from_str(
        r#"{
            "location": "westus",
            "resource_group_name": "packer-Resource-Group-demo",
            "action_timeout_secs": 30,
            "max_retries": 2,
            "retry_delay_ms": 200
        }"#,
    )?;
    config.validate()?;

    let arm = Arc::new(SimulatedArm::default());
    let creator: Arc<dyn ResourceGroupCreator> = arm.clone();
    let deleter: Arc<dyn ResourceGroupDeleter> = arm.clone();

    let mut runner = Runner::builder()
        .step(
            StepCreateResourceGroup::shared(creator)
                .with_shared_cleanup(deleter.clone())
                .with_config(config.action_config()),
        )
        .step(DeployTemplate)
        .step(StepDeleteResourceGroup::shared(deleter).with_config(config.action_config()))
        .teardown(config.teardown())
        .build()?;

    let mut bag = StateBag::new();
    config.seed(&mut bag);

    match runner.run(&mut bag).await {
        Ok(()) => println!("Build completed successfully"),
        Err(error) => {
            eprintln!("Build failed: {error}");
            if let Some(failure) = bag.get_ok(ERROR) {
                eprintln!("Cause: {failure}");
            }
        }
    }

    Ok(())
}
