//! Principals and grant-set resolution
//!
//! This module defines the authenticated actor being evaluated and how its
//! effective grant set is derived: super-admin flag, legacy feature flags,
//! named role, or explicit permission list, first match wins.

use console_org::RoleRegistry;
use console_rbac::GrantSet;
use serde::{Deserialize, Deserializer, Serialize};

/// Minimal grant for a principal whose legacy flags are all unset.
pub const LEGACY_DEFAULT_GRANT: &str = "dashboard:view";

/// Legacy per-feature boolean flags from the old permissions table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LegacyFlag {
    /// Dashboard access
    CanAccessDashboard,
    /// RDS sessions access
    CanAccessRdsSessions,
    /// Servers access
    CanAccessServers,
    /// Users list access
    CanAccessUsers,
    /// AD groups access
    CanAccessAdGroups,
    /// Loans access
    CanAccessLoans,
    /// Document assistant access
    CanAccessDocucortex,
    /// User management
    CanManageUsers,
    /// Permission management
    CanManagePermissions,
    /// Reports
    CanViewReports,
}

/// Static flag to permissions table.
///
/// Adding a legacy flag is a data change here, not a logic change.
pub const LEGACY_FLAG_GRANTS: &[(LegacyFlag, &[&str])] = &[
    (LegacyFlag::CanAccessDashboard, &["dashboard:view"]),
    (LegacyFlag::CanAccessRdsSessions, &["sessions:view", "sessions:edit"]),
    (LegacyFlag::CanAccessServers, &["servers:view"]),
    (LegacyFlag::CanAccessUsers, &["users:view"]),
    (LegacyFlag::CanAccessAdGroups, &["ad_groups:view"]),
    (LegacyFlag::CanAccessLoans, &["loans:view", "loans:create"]),
    (LegacyFlag::CanAccessDocucortex, &["ai_assistant:view", "chat_ged:view"]),
    (LegacyFlag::CanManageUsers, &["users:*"]),
    (LegacyFlag::CanManagePermissions, &["config:admin"]),
    (LegacyFlag::CanViewReports, &["reports:view", "reports:export"]),
];

impl LegacyFlag {
    /// Get the column name of the flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanAccessDashboard => "can_access_dashboard",
            Self::CanAccessRdsSessions => "can_access_rds_sessions",
            Self::CanAccessServers => "can_access_servers",
            Self::CanAccessUsers => "can_access_users",
            Self::CanAccessAdGroups => "can_access_ad_groups",
            Self::CanAccessLoans => "can_access_loans",
            Self::CanAccessDocucortex => "can_access_docucortex",
            Self::CanManageUsers => "can_manage_users",
            Self::CanManagePermissions => "can_manage_permissions",
            Self::CanViewReports => "can_view_reports",
        }
    }

    /// Permission strings granted by the flag.
    pub fn grants(&self) -> &'static [&'static str] {
        LEGACY_FLAG_GRANTS
            .iter()
            .find(|(flag, _)| flag == self)
            .map(|(_, perms)| *perms)
            .unwrap_or_default()
    }
}

/// Legacy flag values carried by a principal.
///
/// `None` means the flag is not carried at all; `Some(false)` means it is
/// carried and unset. Values deserialize from booleans or 0/1 integers, as
/// stored by the old permissions table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegacyFlags {
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_access_dashboard: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_access_rds_sessions: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_access_servers: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_access_users: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_access_ad_groups: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_access_loans: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_access_docucortex: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_manage_users: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_manage_permissions: Option<bool>,
    #[serde(default, deserialize_with = "flag_value", skip_serializing_if = "Option::is_none")]
    pub can_view_reports: Option<bool>,
}

impl LegacyFlags {
    /// Get the carried value of a flag.
    pub fn get(&self, flag: LegacyFlag) -> Option<bool> {
        match flag {
            LegacyFlag::CanAccessDashboard => self.can_access_dashboard,
            LegacyFlag::CanAccessRdsSessions => self.can_access_rds_sessions,
            LegacyFlag::CanAccessServers => self.can_access_servers,
            LegacyFlag::CanAccessUsers => self.can_access_users,
            LegacyFlag::CanAccessAdGroups => self.can_access_ad_groups,
            LegacyFlag::CanAccessLoans => self.can_access_loans,
            LegacyFlag::CanAccessDocucortex => self.can_access_docucortex,
            LegacyFlag::CanManageUsers => self.can_manage_users,
            LegacyFlag::CanManagePermissions => self.can_manage_permissions,
            LegacyFlag::CanViewReports => self.can_view_reports,
        }
    }

    /// Set a flag value.
    pub fn set(&mut self, flag: LegacyFlag, value: bool) {
        let slot = match flag {
            LegacyFlag::CanAccessDashboard => &mut self.can_access_dashboard,
            LegacyFlag::CanAccessRdsSessions => &mut self.can_access_rds_sessions,
            LegacyFlag::CanAccessServers => &mut self.can_access_servers,
            LegacyFlag::CanAccessUsers => &mut self.can_access_users,
            LegacyFlag::CanAccessAdGroups => &mut self.can_access_ad_groups,
            LegacyFlag::CanAccessLoans => &mut self.can_access_loans,
            LegacyFlag::CanAccessDocucortex => &mut self.can_access_docucortex,
            LegacyFlag::CanManageUsers => &mut self.can_manage_users,
            LegacyFlag::CanManagePermissions => &mut self.can_manage_permissions,
            LegacyFlag::CanViewReports => &mut self.can_view_reports,
        };
        *slot = Some(value);
    }

    /// Check if any flag is carried, set or not.
    pub fn is_carried(&self) -> bool {
        LEGACY_FLAG_GRANTS
            .iter()
            .any(|(flag, _)| self.get(*flag).is_some())
    }

    /// Expand set flags into a grant set.
    ///
    /// Falls back to [`LEGACY_DEFAULT_GRANT`] when no carried flag is set.
    pub fn to_grant_set(&self) -> GrantSet {
        let mut grants: GrantSet = LEGACY_FLAG_GRANTS
            .iter()
            .filter(|(flag, _)| self.get(*flag) == Some(true))
            .flat_map(|(_, perms)| perms.iter().copied())
            .collect();
        if grants.is_empty() {
            grants.insert(LEGACY_DEFAULT_GRANT);
        }
        grants
    }
}

fn flag_value<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagValue {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<FlagValue>::deserialize(deserializer)?.map(|value| match value {
        FlagValue::Bool(b) => b,
        FlagValue::Int(i) => i != 0,
    }))
}

/// The authenticated actor being evaluated.
///
/// A principal normally carries one of: a role id, an explicit permission
/// list, or legacy flags. Any combination resolves deterministically, see
/// [`resolve_grant_set`].
///
/// # Example
///
/// ```
/// use console_auth::principal::{resolve_grant_set, Principal};
/// use console_org::RoleRegistry;
///
/// let principal = Principal::new("tech-01").with_role("technician");
/// let grants = resolve_grant_set(&principal, &RoleRegistry::builtin());
/// assert!(grants.has("sessions:edit"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Principal id
    pub id: String,

    /// Login name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Explicit role id
    #[serde(default, alias = "role", skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,

    /// Explicit permission list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,

    /// Unconditional global grant
    #[serde(default, alias = "isSuperAdmin")]
    pub is_super_admin: bool,

    /// Legacy feature flags
    #[serde(flatten)]
    pub legacy: LegacyFlags,
}

impl Principal {
    /// Create a principal carrying nothing.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the login name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the explicit role id.
    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    /// Set the explicit permission list.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    /// Mark as super-admin.
    pub fn with_super_admin(mut self) -> Self {
        self.is_super_admin = true;
        self
    }

    /// Carry a legacy flag.
    pub fn with_legacy_flag(mut self, flag: LegacyFlag, value: bool) -> Self {
        self.legacy.set(flag, value);
        self
    }
}

/// Which resolution rule produced a principal's grant set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    /// Super-admin flag
    SuperAdmin,
    /// Legacy boolean flags
    LegacyFlags,
    /// Named role from the registry
    Role,
    /// Explicit permission list (possibly empty)
    Explicit,
}

/// Resolve a principal's effective grant set and the rule that produced it.
///
/// Rules, first match wins:
/// 1. super-admin flag: `{"*"}`
/// 2. any legacy flag carried: union of the flags' permissions
/// 3. role id resolving in `roles`: that role's permissions
/// 4. otherwise: the explicit permission list, possibly empty
pub fn resolve(principal: &Principal, roles: &RoleRegistry) -> (GrantSource, GrantSet) {
    if principal.is_super_admin {
        return (GrantSource::SuperAdmin, GrantSet::global());
    }

    if principal.legacy.is_carried() {
        return (GrantSource::LegacyFlags, principal.legacy.to_grant_set());
    }

    if let Some(role_id) = principal.role_id.as_deref() {
        match roles.get(role_id) {
            Some(role) => return (GrantSource::Role, role.grant_set()),
            None => {
                tracing::warn!(principal = %principal.id, role = %role_id, "Principal names an unknown role");
            }
        }
    }

    let grants = principal
        .permissions
        .as_deref()
        .map(GrantSet::from_strings)
        .unwrap_or_default();
    (GrantSource::Explicit, grants)
}

/// Resolve a principal's effective grant set. See [`resolve`].
pub fn resolve_grant_set(principal: &Principal, roles: &RoleRegistry) -> GrantSet {
    resolve(principal, roles).1
}
