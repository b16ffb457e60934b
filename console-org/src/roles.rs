//! Role registry and role inference
//!
//! This module defines the built-in role catalogue, the configured
//! [`RoleRegistry`], and the priority-ordered inference of a role from a
//! grant set.

use console_rbac::{GrantSet, PermissionToken};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in console roles.
///
/// Roles are ordered by privilege. The hierarchy is:
/// Viewer < Technician < Manager < GedSpecialist < Admin < SuperAdmin
///
/// Each built-in role carries fallback display metadata and default
/// permissions. Configuration may override the permissions of a role
/// entirely; metadata only fills fields configuration leaves unset.
///
/// # Examples
///
/// ```
/// use console_org::BuiltinRole;
///
/// let role = BuiltinRole::Technician;
/// assert_eq!(role.priority(), 50);
/// assert!(role.default_permissions().contains(&"sessions:edit"));
/// assert!(BuiltinRole::Admin > BuiltinRole::Manager);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRole {
    /// Read-only access
    Viewer,

    /// Technical support
    Technician,

    /// Manager with extended rights
    Manager,

    /// Document management and AI specialist
    GedSpecialist,

    /// Application administrator
    Admin,

    /// Unrestricted access
    SuperAdmin,
}

impl BuiltinRole {
    /// Every built-in role, most privileged first.
    pub const ALL: [BuiltinRole; 6] = [
        Self::SuperAdmin,
        Self::Admin,
        Self::GedSpecialist,
        Self::Manager,
        Self::Technician,
        Self::Viewer,
    ];

    /// Parse role from its id.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(BuiltinRole)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use console_org::BuiltinRole;
    ///
    /// assert_eq!(BuiltinRole::parse("ged_specialist"), Some(BuiltinRole::GedSpecialist));
    /// assert_eq!(BuiltinRole::parse("VIEWER"), Some(BuiltinRole::Viewer));
    /// assert_eq!(BuiltinRole::parse("restricted"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "super_admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "ged_specialist" => Some(Self::GedSpecialist),
            "manager" => Some(Self::Manager),
            "technician" => Some(Self::Technician),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Get the role id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::GedSpecialist => "ged_specialist",
            Self::Manager => "manager",
            Self::Technician => "technician",
            Self::Viewer => "viewer",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Administrateur",
            Self::Admin => "Administrateur",
            Self::GedSpecialist => "Spécialiste GED",
            Self::Manager => "Manager",
            Self::Technician => "Technicien",
            Self::Viewer => "Observateur",
        }
    }

    /// Short description of what the role is for.
    pub fn description(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Accès complet à toutes les fonctionnalités",
            Self::Admin => "Gestion complète de l'application",
            Self::GedSpecialist => "Expert en gestion documentaire et IA",
            Self::Manager => "Gestionnaire avec droits étendus",
            Self::Technician => "Support technique",
            Self::Viewer => "Consultation uniquement",
        }
    }

    /// Badge icon.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "👑",
            Self::Admin => "👨‍💼",
            Self::GedSpecialist => "📚",
            Self::Manager => "👔",
            Self::Technician => "🔧",
            Self::Viewer => "👁️",
        }
    }

    /// Badge color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "#d32f2f",
            Self::Admin => "#f57c00",
            Self::GedSpecialist => "#9c27b0",
            Self::Manager => "#1976d2",
            Self::Technician => "#388e3c",
            Self::Viewer => "#757575",
        }
    }

    /// Priority used for inference; higher is more privileged.
    pub fn priority(&self) -> i32 {
        match self {
            Self::SuperAdmin => 100,
            Self::Admin => 90,
            Self::GedSpecialist => 85,
            Self::Manager => 70,
            Self::Technician => 50,
            Self::Viewer => 10,
        }
    }

    /// Default permissions used when no configuration is supplied.
    pub fn default_permissions(&self) -> &'static [&'static str] {
        match self {
            Self::SuperAdmin => &["*"],
            Self::Admin => &[
                "dashboard:*",
                "sessions:*",
                "computers:*",
                "loans:*",
                "users:*",
                "ad_management:*",
                "chat_ged:*",
                "ai_assistant:*",
                "reports:*",
                "settings:*",
                "config:view",
            ],
            Self::GedSpecialist => &[
                "dashboard:view",
                "chat_ged:*",
                "ai_assistant:*",
                "ged_upload:create",
                "ged_delete:delete",
                "ged_network_scan:admin",
                "ged_index_manage:admin",
                "ged_stats_view:view",
                "reports:view",
                "reports:export",
            ],
            Self::Manager => &[
                "dashboard:view",
                "sessions:view",
                "computers:*",
                "loans:*",
                "users:view",
                "chat_ged:view",
                "chat_ged:create",
                "ai_assistant:view",
                "reports:view",
                "reports:export",
            ],
            Self::Technician => &[
                "dashboard:view",
                "sessions:view",
                "sessions:edit",
                "computers:view",
                "loans:view",
                "loans:create",
                "chat_ged:view",
                "ai_assistant:view",
                "reports:view",
            ],
            Self::Viewer => &[
                "dashboard:view",
                "sessions:view",
                "computers:view",
                "loans:view",
                "reports:view",
            ],
        }
    }
}

/// A named, prioritized bundle of permissions with display metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Role id (e.g. `"technician"`)
    pub id: String,

    /// Display name
    #[serde(alias = "name")]
    pub display_name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Badge icon
    #[serde(default)]
    pub icon: String,

    /// Badge color
    #[serde(default)]
    pub color: String,

    /// Higher is more privileged
    #[serde(default)]
    pub priority: i32,

    /// Signature permissions
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Role {
    /// Get the role's permissions as a grant set.
    pub fn grant_set(&self) -> GrantSet {
        GrantSet::from_strings(&self.permissions)
    }

    /// Check if `grants` fully covers this role's signature permissions.
    ///
    /// Every signature entry must be granted. A `*` entry is covered only by
    /// a global grant, since `*` is never a valid query. A role with no
    /// signature permissions is never covered.
    pub fn is_covered_by(&self, grants: &GrantSet) -> bool {
        !self.permissions.is_empty()
            && self.permissions.iter().all(|perm| match PermissionToken::parse(perm) {
                PermissionToken::Global => grants.contains_global(),
                _ => grants.has(perm),
            })
    }
}

impl From<BuiltinRole> for Role {
    fn from(role: BuiltinRole) -> Self {
        Self {
            id: role.as_str().to_string(),
            display_name: role.display_name().to_string(),
            description: role.description().to_string(),
            icon: role.icon().to_string(),
            color: role.color().to_string(),
            priority: role.priority(),
            permissions: role
                .default_permissions()
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Configuration-supplied role definition.
///
/// Every field but `permissions` is optional; unset metadata falls back to
/// the built-in catalogue when the id is a built-in role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleConfig {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Badge icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Badge color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Inference priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    /// Signature permissions, authoritative
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl RoleConfig {
    /// Merge this configuration with built-in fallback metadata.
    ///
    /// Permissions always come from configuration, never from the catalogue.
    ///
    /// # Examples
    ///
    /// ```
    /// use console_org::RoleConfig;
    ///
    /// let config = RoleConfig {
    ///     permissions: vec!["sessions:view".to_string()],
    ///     ..Default::default()
    /// };
    /// let role = config.into_role("technician");
    /// assert_eq!(role.display_name, "Technicien");
    /// assert_eq!(role.priority, 50);
    /// assert_eq!(role.permissions, vec!["sessions:view"]);
    /// ```
    pub fn into_role(self, id: &str) -> Role {
        let builtin = BuiltinRole::parse(id);
        let fallback = |f: fn(&BuiltinRole) -> &'static str| {
            builtin.map(|b| f(&b).to_string()).unwrap_or_default()
        };

        Role {
            id: id.to_string(),
            display_name: self.name.unwrap_or_else(|| {
                builtin
                    .map(|b| b.display_name().to_string())
                    .unwrap_or_else(|| id.to_string())
            }),
            description: self
                .description
                .unwrap_or_else(|| fallback(BuiltinRole::description)),
            icon: self.icon.unwrap_or_else(|| fallback(BuiltinRole::icon)),
            color: self.color.unwrap_or_else(|| fallback(BuiltinRole::color)),
            priority: self
                .priority
                .or_else(|| builtin.map(|b| b.priority()))
                .unwrap_or_default(),
            permissions: self.permissions,
        }
    }
}

/// Read-only registry of roles keyed by id.
///
/// Built once from configuration (or the built-in catalogue) and never
/// mutated; a configuration change builds a new registry.
///
/// # Examples
///
/// ```
/// use console_org::RoleRegistry;
/// use console_rbac::GrantSet;
///
/// let registry = RoleRegistry::builtin();
/// assert_eq!(registry.get("manager").map(|r| r.priority), Some(70));
///
/// let grants = GrantSet::from_strings(&["*"]);
/// assert_eq!(registry.infer(&grants).map(|r| r.id.as_str()), Some("super_admin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    roles: BTreeMap<String, Role>,
}

impl RoleRegistry {
    /// Create a registry from fully specified roles.
    pub fn new<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self {
            roles: roles.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    /// Registry holding the built-in catalogue with default permissions.
    pub fn builtin() -> Self {
        Self::new(BuiltinRole::ALL.into_iter().map(Role::from))
    }

    /// Build a registry from configured roles.
    ///
    /// Configured ids replace the built-in role of the same id; built-in
    /// roles configuration leaves out are kept, so an empty configuration
    /// yields the built-in catalogue. Metadata is enriched from the
    /// catalogue; malformed permission strings are kept (they never match)
    /// and reported.
    pub fn from_config(roles: BTreeMap<String, RoleConfig>) -> Self {
        let mut registry = Self::builtin();
        for (id, config) in roles {
            for perm in &config.permissions {
                if !PermissionToken::parse(perm).is_valid() {
                    tracing::warn!(role = %id, permission = %perm, "Role declares a malformed permission");
                }
            }
            let role = config.into_role(&id);
            registry.roles.insert(id, role);
        }
        registry
    }

    /// Look up a role by id.
    pub fn get(&self, role_id: &str) -> Option<&Role> {
        self.roles.get(role_id)
    }

    /// Roles ordered by descending priority; equal priorities by id.
    pub fn sorted_by_priority(&self) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self.roles.values().collect();
        roles.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        roles
    }

    /// Infer the best-fit role for a grant set.
    ///
    /// Returns the highest-priority role whose signature permissions are all
    /// covered by `grants`, or `None` when no role is covered.
    pub fn infer(&self, grants: &GrantSet) -> Option<&Role> {
        let role = self
            .sorted_by_priority()
            .into_iter()
            .find(|role| role.is_covered_by(grants));
        if role.is_none() {
            tracing::debug!(grants = grants.len(), "No role covered by grant set");
        }
        role
    }

    /// Iterate roles ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    /// Get the count of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Resolve a role by id. Unknown ids yield `None`.
pub fn resolve_role<'a>(role_id: &str, registry: &'a RoleRegistry) -> Option<&'a Role> {
    registry.get(role_id)
}

/// Infer a role from a grant set. See [`RoleRegistry::infer`].
pub fn infer_role<'a>(grants: &GrantSet, registry: &'a RoleRegistry) -> Option<&'a Role> {
    registry.infer(grants)
}
