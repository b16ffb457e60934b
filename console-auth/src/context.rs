//! Access context and snapshot service
//!
//! An [`AccessContext`] is an immutable evaluation snapshot: the current
//! principal, the role registry, the module registry and the grant set
//! resolved from them. Every query a route guard or UI asks is answered
//! from one snapshot.
//!
//! [`AccessService`] owns the current snapshot and swaps it atomically when
//! the principal or the configuration changes. Readers never observe a
//! half-updated registry.

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use console_org::{infer_role, resolve_role, Role, RoleRegistry};
use console_rbac::{Action, GrantSet, ModuleDescriptor, ModuleRegistry};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AccessConfig;
use crate::error::AccessResult;
use crate::principal::{resolve, GrantSource, Principal};

/// Queries any of which make a principal an administrator.
pub const ADMIN_PERMISSIONS: [&str; 3] = ["config:*", "config:admin", "*"];

/// Immutable evaluation snapshot.
///
/// The grant set is resolved once when the snapshot is built. Without a
/// principal every query is denied.
///
/// # Examples
///
/// ```
/// use console_auth::{AccessContext, Principal};
/// use console_org::RoleRegistry;
/// use std::sync::Arc;
///
/// let ctx = AccessContext::new(
///     Some(Principal::new("tech-01").with_role("technician")),
///     Arc::new(RoleRegistry::builtin()),
/// );
///
/// assert!(ctx.has_permission("sessions:edit"));
/// assert!(ctx.can_access_module("Sessions"));
/// assert!(!ctx.is_admin());
/// assert_eq!(ctx.user_role().map(|r| r.id.as_str()), Some("technician"));
/// ```
#[derive(Debug, Clone)]
pub struct AccessContext {
    revision: Uuid,
    installed_at: DateTime<Utc>,
    principal: Option<Principal>,
    roles: Arc<RoleRegistry>,
    modules: ModuleRegistry,
    source: Option<GrantSource>,
    grants: GrantSet,
}

impl AccessContext {
    /// Build a snapshot over the built-in module registry.
    pub fn new(principal: Option<Principal>, roles: Arc<RoleRegistry>) -> Self {
        Self::with_modules(principal, roles, ModuleRegistry::builtin())
    }

    /// Build a snapshot over a specific module registry.
    pub fn with_modules(
        principal: Option<Principal>,
        roles: Arc<RoleRegistry>,
        modules: ModuleRegistry,
    ) -> Self {
        let (source, grants) = match &principal {
            Some(principal) => {
                let (source, grants) = resolve(principal, &roles);
                (Some(source), grants)
            }
            None => (None, GrantSet::new()),
        };

        Self {
            revision: Uuid::now_v7(),
            installed_at: Utc::now(),
            principal,
            roles,
            modules,
            source,
            grants,
        }
    }

    /// Snapshot with no principal.
    pub fn anonymous(roles: Arc<RoleRegistry>) -> Self {
        Self::new(None, roles)
    }

    /// Rebuild for another principal, keeping both registries.
    pub fn with_principal(&self, principal: Option<Principal>) -> Self {
        Self::with_modules(principal, Arc::clone(&self.roles), self.modules)
    }

    /// Rebuild against another role registry, keeping the principal.
    pub fn with_roles(&self, roles: Arc<RoleRegistry>) -> Self {
        Self::with_modules(self.principal.clone(), roles, self.modules)
    }

    /// Snapshot revision (UUIDv7, time-ordered).
    pub fn revision(&self) -> Uuid {
        self.revision
    }

    /// When the snapshot was built.
    pub fn installed_at(&self) -> DateTime<Utc> {
        self.installed_at
    }

    /// The evaluated principal, `None` when nobody is signed in.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Role registry the grants were resolved against.
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Module registry used for gating.
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Which resolution rule produced the grant set, `None` without a principal.
    pub fn grant_source(&self) -> Option<GrantSource> {
        self.source
    }

    /// The resolved grant set.
    pub fn grants(&self) -> &GrantSet {
        &self.grants
    }

    /// Check a single permission.
    pub fn has_permission(&self, required: &str) -> bool {
        self.grants.has(required)
    }

    /// Check if at least one permission is held. Empty input is `false`.
    pub fn has_any_permission<S: AsRef<str>>(&self, required: &[S]) -> bool {
        self.grants.has_any(required)
    }

    /// Check if every permission is held. Empty input is `false`.
    pub fn has_all_permissions<S: AsRef<str>>(&self, required: &[S]) -> bool {
        self.grants.has_all(required)
    }

    /// The principal's role: the explicit role when it resolves, otherwise
    /// the role inferred from the grant set.
    pub fn user_role(&self) -> Option<&Role> {
        let principal = self.principal.as_ref()?;
        principal
            .role_id
            .as_deref()
            .and_then(|role_id| resolve_role(role_id, &self.roles))
            .or_else(|| infer_role(&self.grants, &self.roles))
    }

    /// Check for any of [`ADMIN_PERMISSIONS`].
    pub fn is_admin(&self) -> bool {
        self.grants.has_any(&ADMIN_PERMISSIONS)
    }

    /// Check for the global grant.
    ///
    /// `*` is never a valid query, so this inspects the grant set directly.
    pub fn is_super_admin(&self) -> bool {
        self.grants.contains_global()
    }

    /// Check if a module is visible. Ids are case-insensitive.
    pub fn can_access_module(&self, module_id: &str) -> bool {
        self.modules.can_access(module_id, &self.grants)
    }

    /// Visible modules in registry order.
    pub fn accessible_modules(&self) -> Vec<&'static ModuleDescriptor> {
        self.modules.accessible(&self.grants)
    }

    /// Actions held within a module, in vocabulary order. Ids are
    /// case-insensitive for registered modules.
    pub fn module_actions(&self, module_id: &str) -> Vec<Action> {
        self.modules.module_actions(module_id, &self.grants)
    }

    /// Summarize the snapshot for hand-off to a UI.
    pub fn summary(&self) -> AccessSummary {
        let role = self.user_role();
        AccessSummary {
            revision: self.revision,
            principal_id: self.principal.as_ref().map(|p| p.id.clone()),
            username: self.principal.as_ref().and_then(|p| p.username.clone()),
            role_id: role.map(|r| r.id.clone()),
            role_name: role.map(|r| r.display_name.clone()),
            source: self.source,
            permissions: self.grants.to_vec(),
            modules: self
                .accessible_modules()
                .into_iter()
                .map(|m| m.id.to_string())
                .collect(),
            is_admin: self.is_admin(),
            is_super_admin: self.is_super_admin(),
        }
    }
}

/// Serializable view of an [`AccessContext`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccessSummary {
    /// Snapshot revision
    pub revision: Uuid,
    /// Principal id
    pub principal_id: Option<String>,
    /// Login name
    pub username: Option<String>,
    /// Explicit or inferred role id
    pub role_id: Option<String>,
    /// Role display name
    pub role_name: Option<String>,
    /// Resolution rule behind `permissions`
    pub source: Option<GrantSource>,
    /// Resolved permission strings
    pub permissions: Vec<String>,
    /// Accessible module ids in registry order
    pub modules: Vec<String>,
    /// Holds an admin permission
    pub is_admin: bool,
    /// Holds the global grant
    pub is_super_admin: bool,
}

/// Holder of the current [`AccessContext`].
///
/// Reads are lock-free loads of the current snapshot; updates build a new
/// snapshot and swap it in whole.
///
/// # Examples
///
/// ```
/// use console_auth::{AccessConfig, AccessService, Principal};
///
/// let service = AccessService::new(&AccessConfig::default());
/// assert!(!service.context().has_permission("dashboard:view"));
///
/// service.set_principal(Some(Principal::new("v").with_role("viewer")));
/// assert!(service.context().has_permission("dashboard:view"));
/// ```
pub struct AccessService {
    current: ArcSwap<AccessContext>,
}

impl AccessService {
    /// Create a service with no principal.
    pub fn new(config: &AccessConfig) -> Self {
        let context = AccessContext::anonymous(Arc::new(config.role_registry()));
        tracing::info!(
            revision = %context.revision(),
            roles = context.roles().len(),
            "Access snapshot installed"
        );
        Self {
            current: ArcSwap::from_pointee(context),
        }
    }

    /// Create a service configured from the environment.
    pub fn from_env() -> AccessResult<Self> {
        Ok(Self::new(&AccessConfig::from_env()?))
    }

    /// Current snapshot.
    pub fn context(&self) -> Arc<AccessContext> {
        self.current.load_full()
    }

    /// Replace the principal, keeping the registries.
    ///
    /// Returns the snapshot this call installed.
    pub fn set_principal(&self, principal: Option<Principal>) -> Arc<AccessContext> {
        self.replace(|current| current.with_principal(principal.clone()))
    }

    /// Replace the role registry, keeping the principal.
    ///
    /// Returns the snapshot this call installed.
    pub fn set_config(&self, config: &AccessConfig) -> Arc<AccessContext> {
        let roles = Arc::new(config.role_registry());
        self.replace(|current| current.with_roles(Arc::clone(&roles)))
    }

    /// Install a prebuilt snapshot, returning the one it replaces.
    pub fn install(&self, context: AccessContext) -> Arc<AccessContext> {
        let installed = Arc::new(context);
        let previous = self.current.swap(Arc::clone(&installed));
        log_swap(&previous, &installed);
        previous
    }

    /// Rebuild from the current snapshot and swap, retrying on contention.
    fn replace<F>(&self, build: F) -> Arc<AccessContext>
    where
        F: Fn(&AccessContext) -> AccessContext,
    {
        let mut installed = None;
        let previous = self.current.rcu(|current| {
            let next = Arc::new(build(current));
            installed = Some(Arc::clone(&next));
            next
        });
        // rcu stores the value from its last attempt
        let installed = installed.unwrap_or_else(|| self.current.load_full());
        log_swap(&previous, &installed);
        installed
    }
}

fn log_swap(previous: &AccessContext, installed: &AccessContext) {
    tracing::info!(
        previous = %previous.revision(),
        revision = %installed.revision(),
        roles = installed.roles().len(),
        principal = installed.principal().map(|p| p.id.as_str()).unwrap_or("-"),
        "Access snapshot installed"
    );
}

impl Default for AccessService {
    fn default() -> Self {
        Self::new(&AccessConfig::default())
    }
}
