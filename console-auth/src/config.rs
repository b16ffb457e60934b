//! Access configuration.
//!
//! Supplies the role registry the engine evaluates against. Configuration
//! is parsed from JSON text, either handed over by the host application or
//! read from the `CONSOLE_ACCESS_CONFIG` environment variable. Reading and
//! persisting configuration files is the host's concern.

use console_org::{RoleConfig, RoleRegistry};
use console_rbac::PermissionToken;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AccessError, AccessResult};

/// Environment variable holding the JSON configuration.
pub const CONFIG_ENV_VAR: &str = "CONSOLE_ACCESS_CONFIG";

/// Access configuration.
///
/// # Example
///
/// ```
/// use console_auth::AccessConfig;
///
/// let config = AccessConfig::from_json(
///     r#"{"roles": {"technician": {"permissions": ["sessions:view", "sessions:edit"]}}}"#,
/// )
/// .unwrap();
///
/// let registry = config.role_registry();
/// assert_eq!(registry.len(), 6);
/// let technician = registry.get("technician").unwrap();
/// assert_eq!(technician.display_name, "Technicien");
/// assert_eq!(technician.permissions, vec!["sessions:view", "sessions:edit"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessConfig {
    /// Configured roles by id.
    ///
    /// Each entry replaces the built-in role of the same id. Built-in roles
    /// left out, or a missing section, keep their defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeMap<String, RoleConfig>>,
}

impl AccessConfig {
    /// Parse configuration from JSON text.
    pub fn from_json(json: &str) -> AccessResult<Self> {
        serde_json::from_str(json).map_err(|e| AccessError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from the environment.
    ///
    /// Environment variables:
    /// - `CONSOLE_ACCESS_CONFIG`: JSON configuration (default: built-in roles)
    pub fn from_env() -> AccessResult<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(json) => Self::from_json(&json),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(AccessError::InvalidConfig(format!("{}: {}", CONFIG_ENV_VAR, e))),
        }
    }

    /// Build the role registry this configuration describes.
    pub fn role_registry(&self) -> RoleRegistry {
        RoleRegistry::from_config(self.roles.clone().unwrap_or_default())
    }

    /// Check that every role permission is well-formed.
    ///
    /// Malformed permissions are harmless at evaluation time (they never
    /// match), so this is for tooling that wants to reject them up front.
    pub fn validate(&self) -> AccessResult<()> {
        let Some(roles) = &self.roles else {
            return Ok(());
        };

        for (role, config) in roles {
            if let Some(permission) = config
                .permissions
                .iter()
                .find(|p| !PermissionToken::parse(p).is_valid())
            {
                return Err(AccessError::InvalidPermission {
                    role: role.clone(),
                    permission: permission.clone(),
                });
            }
        }
        Ok(())
    }
}
