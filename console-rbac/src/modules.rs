//! # Modules
//!
//! The ordered registry of navigable console areas and the resolver that
//! decides which of them a grant set may open, and with which actions.

use serde::Serialize;

use crate::actions::Action;
use crate::permissions::{GrantSet, PermissionToken};

/// A navigable console area gated by a single permission string.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct ModuleDescriptor {
    /// Module id, also the scope of its permissions (e.g. `"sessions"`).
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Menu icon.
    pub icon: &'static str,
    /// Route path.
    pub path: &'static str,
    /// Short description shown in menus.
    pub description: &'static str,
    /// Permission string required to see the module.
    pub required_permission: &'static str,
}

impl ModuleDescriptor {
    /// Create a descriptor with no icon, path or description.
    pub const fn new(id: &'static str, label: &'static str, required_permission: &'static str) -> Self {
        Self {
            id,
            label,
            icon: "",
            path: "",
            description: "",
            required_permission,
        }
    }
}

/// Built-in console modules, in menu order.
pub const BUILTIN_MODULES: &[ModuleDescriptor] = &[
    ModuleDescriptor {
        id: "dashboard",
        label: "Tableau de bord",
        icon: "📊",
        path: "/dashboard",
        description: "Vue d'ensemble de l'activité",
        required_permission: "dashboard:view",
    },
    ModuleDescriptor {
        id: "sessions",
        label: "Sessions RDS",
        icon: "🖥️",
        path: "/sessions",
        description: "Gestion des sessions RDS",
        required_permission: "sessions:view",
    },
    ModuleDescriptor {
        id: "servers",
        label: "Serveurs",
        icon: "💻",
        path: "/servers",
        description: "Gestion des serveurs",
        required_permission: "servers:view",
    },
    ModuleDescriptor {
        id: "users",
        label: "Utilisateurs",
        icon: "👤",
        path: "/users",
        description: "Gestion des utilisateurs",
        required_permission: "users:view",
    },
    ModuleDescriptor {
        id: "ad_groups",
        label: "Groupes AD",
        icon: "👥",
        path: "/ad-groups",
        description: "Gestion des groupes Active Directory",
        required_permission: "ad_groups:view",
    },
    ModuleDescriptor {
        id: "loans",
        label: "Prêts",
        icon: "📦",
        path: "/loans",
        description: "Gestion des prêts de matériel",
        required_permission: "loans:view",
    },
    ModuleDescriptor {
        id: "ai_assistant",
        label: "DocuCortex IA",
        icon: "🤖",
        path: "/ai-assistant",
        description: "Assistant IA documentaire",
        required_permission: "ai_assistant:view",
    },
];

/// Read-only, ordered list of modules.
///
/// Registries are static data; the resolver never mutates them.
///
/// # Example
///
/// ```
/// use console_rbac::modules::ModuleRegistry;
/// use console_rbac::permissions::GrantSet;
///
/// let registry = ModuleRegistry::builtin();
/// let grants = GrantSet::from_strings(&["dashboard:view", "sessions:*", "loans:*"]);
///
/// assert!(registry.can_access("Sessions", &grants));
/// assert!(!registry.can_access("users", &grants));
///
/// let ids: Vec<&str> = registry.accessible(&grants).iter().map(|m| m.id).collect();
/// assert_eq!(ids, ["dashboard", "sessions", "loans"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ModuleRegistry {
    modules: &'static [ModuleDescriptor],
}

impl ModuleRegistry {
    /// Wrap a static module list.
    pub const fn new(modules: &'static [ModuleDescriptor]) -> Self {
        Self { modules }
    }

    /// The built-in console modules.
    pub const fn builtin() -> Self {
        Self::new(BUILTIN_MODULES)
    }

    /// Look up a module by id, ignoring ASCII case.
    pub fn get(&self, module_id: &str) -> Option<&'static ModuleDescriptor> {
        self.modules.iter().find(|m| m.id.eq_ignore_ascii_case(module_id))
    }

    /// Check whether `grants` may open the module. Unknown ids yield `false`.
    pub fn can_access(&self, module_id: &str, grants: &GrantSet) -> bool {
        self.get(module_id)
            .is_some_and(|module| grants.has(module.required_permission))
    }

    /// Modules whose required permission is granted, in registry order.
    pub fn accessible(&self, grants: &GrantSet) -> Vec<&'static ModuleDescriptor> {
        self.modules
            .iter()
            .filter(|module| grants.has(module.required_permission))
            .collect()
    }

    /// Actions `grants` allows on a module.
    ///
    /// Registered ids are matched ignoring ASCII case, like
    /// [`can_access`](Self::can_access); other ids are used verbatim.
    pub fn module_actions(&self, module_id: &str, grants: &GrantSet) -> Vec<Action> {
        let module_id = self.get(module_id).map_or(module_id, |module| module.id);
        module_actions(module_id, grants)
    }

    /// Iterate every module in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ModuleDescriptor> {
        self.modules.iter()
    }

    /// Get the count of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Actions `grants` allows on `module_id`, in vocabulary order.
///
/// A global grant yields the whole vocabulary. Otherwise each action is
/// checked as `<module_id>:<action>` with the usual matching rules, so
/// `edit` brings `view`. Reserved actions are listed only for an exact
/// grant: `scope:*` lists every action but `admin`.
///
/// The module id is taken verbatim and not looked up in any registry; an
/// id nobody holds grants for simply yields an empty list. See
/// [`ModuleRegistry::module_actions`] for case-insensitive ids.
///
/// # Example
///
/// ```
/// use console_rbac::actions::Action;
/// use console_rbac::modules::module_actions;
/// use console_rbac::permissions::GrantSet;
///
/// let grants = GrantSet::from_strings(&["sessions:edit"]);
/// assert_eq!(module_actions("sessions", &grants), vec![Action::View, Action::Edit]);
/// ```
pub fn module_actions(module_id: &str, grants: &GrantSet) -> Vec<Action> {
    if grants.contains_global() {
        return Action::all();
    }

    Action::ALL
        .into_iter()
        .filter(|action| {
            if action.is_reserved() {
                grants
                    .tokens()
                    .contains(&PermissionToken::scoped(module_id, *action))
            } else {
                grants.has(&format!("{}:{}", module_id, action))
            }
        })
        .collect()
}
