//! # Console RBAC
//!
//! Permission string matching for the admin console.
//!
//! ## Overview
//!
//! The console-rbac crate handles:
//! - **Permission tokens**: Total parsing of permission strings
//! - **Grant sets**: The permissions a principal holds, with matching
//! - **Actions**: The closed action vocabulary and implication rule
//! - **Modules**: The static module registry and module gating
//!
//! ## Permission strings
//!
//! ```text
//! *               - everything
//! scope:action    - one action within a scope
//! scope:*         - every action within a scope
//!
//! scope, action  := [A-Za-z0-9_]+
//! ```
//!
//! Anything else is malformed and inert: it matches nothing, as a grant or
//! as a query. Denial is always `false`, never an error.
//!
//! ## Usage
//!
//! ```rust
//! use console_rbac::{module_actions, Action, GrantSet, ModuleRegistry};
//!
//! let grants = GrantSet::from_strings(&["dashboard:view", "sessions:*", "loans:edit"]);
//!
//! assert!(grants.has("sessions:delete"));
//! assert!(grants.has("loans:view")); // edit implies view
//! assert!(grants.has("sessions:admin"));
//!
//! let registry = ModuleRegistry::builtin();
//! assert!(registry.can_access("loans", &grants));
//! assert_eq!(module_actions("loans", &grants), vec![Action::View, Action::Edit]);
//! assert!(!module_actions("sessions", &grants).contains(&Action::Admin));
//! ```
//!
//! ## Action Implications
//!
//! - `edit` implies `view`
//! - nothing else implies anything

pub mod actions;
pub mod modules;
pub mod permissions;

// Re-export main types for convenience
pub use actions::Action;
pub use modules::{module_actions, ModuleDescriptor, ModuleRegistry, BUILTIN_MODULES};
pub use permissions::{
    has_all_permissions, has_any_permission, has_permission, GrantSet, PermissionToken,
};
