//! # Console Authorization
//!
//! This crate answers authorization questions for the admin console:
//! which permissions the current principal holds, which role it plays,
//! which modules it may open and what it may do inside them.
//!
//! ## Overview
//!
//! The console-auth crate handles:
//! - **Principals**: The evaluated actor and its grant-set resolution
//! - **Access contexts**: Immutable snapshots answering every query
//! - **Access service**: Atomic snapshot replacement on reload
//! - **Configuration**: Role configuration from JSON or the environment
//!
//! ## Usage
//!
//! ```rust
//! use console_auth::{AccessConfig, AccessService, Principal};
//! use console_rbac::Action;
//!
//! let service = AccessService::new(&AccessConfig::default());
//! service.set_principal(Some(Principal::new("tech-01").with_role("technician")));
//!
//! let ctx = service.context();
//! assert!(ctx.has_permission("sessions:edit"));
//! assert!(ctx.has_permission("sessions:view"));
//! assert!(!ctx.has_permission("sessions:delete"));
//! assert!(!ctx.can_access_module("users"));
//! assert_eq!(ctx.module_actions("loans"), vec![Action::View, Action::Create]);
//! ```
//!
//! ## Grant resolution
//!
//! First match wins:
//! 1. super-admin flag: `*`
//! 2. legacy feature flags: union of the flag table entries
//! 3. named role resolving in the registry: its permissions
//! 4. explicit permission list, possibly empty
//!
//! ## Cross-Crate Integration
//!
//! This crate integrates with:
//! - `console-rbac`: Permission matching and module gating
//! - `console-org`: Role registry and role inference

pub mod config;
pub mod context;
pub mod error;
pub mod principal;

// Re-export main types
pub use config::{AccessConfig, CONFIG_ENV_VAR};
pub use context::{AccessContext, AccessService, AccessSummary, ADMIN_PERMISSIONS};
pub use error::{AccessError, AccessResult};
pub use principal::{
    resolve, resolve_grant_set, GrantSource, LegacyFlag, LegacyFlags, Principal,
    LEGACY_DEFAULT_GRANT, LEGACY_FLAG_GRANTS,
};
