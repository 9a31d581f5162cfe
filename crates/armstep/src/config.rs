//! Build settings that seed the state bag and tune the engine.

use crate::constants::{ARM_LOCATION, ARM_RESOURCE_GROUP_NAME};
use crate::runner::TeardownPolicy;
use armstep_core::{ActionConfig, RetryPolicy, StateBag, WorkflowError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_retry_delay_ms() -> u64 {
    1_000
}

/// Settings for a resource-group build.
///
/// # Examples
///
/// ```
/// use armstep::{ArmConfig, StateBag};
/// use armstep::constants::ARM_LOCATION;
///
/// let config = ArmConfig::new("westus", "packer-rg");
/// config.validate().unwrap();
///
/// let mut bag = StateBag::new();
/// config.seed(&mut bag);
/// assert_eq!(bag.get(ARM_LOCATION), "westus");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmConfig {
    pub location: String,
    pub resource_group_name: String,
    #[serde(default)]
    pub teardown: TeardownPolicy,
    /// Per-attempt limit for each action call.
    #[serde(default)]
    pub action_timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl ArmConfig {
    pub fn new(location: impl Into<String>, resource_group_name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            resource_group_name: resource_group_name.into(),
            teardown: TeardownPolicy::default(),
            action_timeout_secs: None,
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }

    /// Rejects blank names and a zero timeout.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.location.trim().is_empty() {
            return Err(WorkflowError::Configuration(
                "location must not be empty".to_string(),
            ));
        }
        if self.resource_group_name.trim().is_empty() {
            return Err(WorkflowError::Configuration(
                "resource_group_name must not be empty".to_string(),
            ));
        }
        if self.action_timeout_secs == Some(0) {
            return Err(WorkflowError::Configuration(
                "action_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Writes the ARM input keys into the bag.
    pub fn seed(&self, bag: &mut StateBag) {
        bag.put(ARM_LOCATION, self.location.clone());
        bag.put(ARM_RESOURCE_GROUP_NAME, self.resource_group_name.clone());
    }

    pub fn action_config(&self) -> ActionConfig {
        let retry_policy = if self.max_retries == 0 {
            RetryPolicy::None
        } else {
            RetryPolicy::fixed(self.max_retries, Duration::from_millis(self.retry_delay_ms))
        };
        ActionConfig {
            timeout: self.action_timeout_secs.map(Duration::from_secs),
            retry_policy,
        }
    }

    pub fn teardown(&self) -> TeardownPolicy {
        self.teardown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let config: ArmConfig = serde_json::from_str(
            r#"{ "location": "westus", "resource_group_name": "rg1" }"#,
        )
        .unwrap();

        assert_eq!(config, ArmConfig::new("westus", "rg1"));
        assert_eq!(config.teardown(), TeardownPolicy::OnHalt);
        assert_eq!(config.action_config().retry_policy, RetryPolicy::None);
        assert_eq!(config.action_config().timeout, None);
    }

    #[test]
    fn test_parse_full() {
        let config: ArmConfig = serde_json::from_str(
            r#"{
                "location": "eastus2",
                "resource_group_name": "rg2",
                "teardown": "always",
                "action_timeout_secs": 600,
                "max_retries": 3,
                "retry_delay_ms": 250
            }"#,
        )
        .unwrap();

        assert_eq!(config.teardown(), TeardownPolicy::Always);
        let action = config.action_config();
        assert_eq!(action.timeout, Some(Duration::from_secs(600)));
        assert_eq!(
            action.retry_policy,
            RetryPolicy::fixed(3, Duration::from_millis(250))
        );
    }

    #[test]
    fn test_validate() {
        assert!(ArmConfig::new("westus", "rg1").validate().is_ok());

        let err = ArmConfig::new(" ", "rg1").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid pipeline configuration: location must not be empty"
        );

        assert!(ArmConfig::new("westus", "").validate().is_err());

        let mut config = ArmConfig::new("westus", "rg1");
        config.action_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed() {
        let mut bag = StateBag::new();
        ArmConfig::new("westus", "rg1").seed(&mut bag);

        assert_eq!(bag.get(ARM_LOCATION), "westus");
        assert_eq!(bag.get(ARM_RESOURCE_GROUP_NAME), "rg1");
    }
}
