//! Azure Resource Manager state bag keys.
//!
//! The names are part of the contract between steps and must stay stable.

use armstep_core::StateKey;

pub use armstep_core::keys::{ERROR, HALTED};

/// Azure region the resource group is created in.
pub const ARM_LOCATION: StateKey<String> = StateKey::new("ArmLocation");

/// Name of the resource group the build provisions into.
pub const ARM_RESOURCE_GROUP_NAME: StateKey<String> = StateKey::new("ArmResourceGroupName");
