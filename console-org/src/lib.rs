//! # Console Roles
//!
//! This crate provides the role registry for the admin console.
//!
//! ## Overview
//!
//! The console-org crate handles:
//! - **Built-in roles**: The default catalogue with display metadata
//! - **Role configuration**: Partial role definitions enriched from the catalogue
//! - **Role registry**: Read-only lookup by id
//! - **Inference**: Best-fit role for a grant set
//!
//! ## Architecture
//!
//! ```text
//! RoleConfig (per id) ──merge metadata──→ Role ──→ RoleRegistry
//!                                                     ├─ get(id)
//!                                                     └─ infer(GrantSet)
//! ```
//!
//! Inference walks roles by descending priority and returns the first role
//! whose signature permissions the grant set fully covers.
//!
//! ## Usage
//!
//! ```rust
//! use console_org::RoleRegistry;
//! use console_rbac::GrantSet;
//!
//! let registry = RoleRegistry::builtin();
//!
//! let grants = GrantSet::from_strings(&[
//!     "dashboard:view",
//!     "sessions:view",
//!     "computers:view",
//!     "loans:view",
//!     "reports:view",
//! ]);
//! assert_eq!(registry.infer(&grants).map(|r| r.id.as_str()), Some("viewer"));
//! ```
//!
//! ## Cross-Crate Integration
//!
//! - `console-rbac`: Grant sets and permission matching
//! - `console-auth`: Principals resolve their role through this registry

pub mod roles;

// Re-export main types for convenience
pub use roles::{infer_role, resolve_role, BuiltinRole, Role, RoleConfig, RoleRegistry};
