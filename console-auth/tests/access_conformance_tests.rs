//! Conformance tests for the access evaluation engine.
//!
//! These tests exercise the public surface of the three console crates
//! together: permission matching, grant resolution, role inference, module
//! gating, and snapshot replacement under concurrent readers.
//!
//! Test groups:
//! 1. Permission matching properties
//! 2. Module gating scenarios
//! 3. Role and module registry consistency
//! 4. Principal resolution end to end
//! 5. Concurrent evaluation during snapshot swaps

use console_auth::{AccessConfig, AccessContext, AccessService, GrantSource, LegacyFlag, Principal};
use console_org::{BuiltinRole, RoleRegistry};
use console_rbac::{
    has_all_permissions, has_any_permission, has_permission, module_actions, Action, GrantSet,
    ModuleRegistry,
};
use std::sync::Arc;

/// Queries covering well-formed, wildcard and malformed inputs.
const QUERIES: &[&str] = &[
    "dashboard:view",
    "dashboard:edit",
    "sessions:view",
    "sessions:edit",
    "sessions:admin",
    "loans:delete",
    "config:*",
    "*",
    "dashboard",
    " dashboard : view ",
    "",
];

/// Grant sets used for the any/all equivalence checks.
fn grant_sets() -> Vec<Vec<&'static str>> {
    vec![
        vec![],
        vec!["*"],
        vec!["dashboard:*"],
        vec!["sessions:edit"],
        vec!["sessions:view", "loans:delete"],
        vec!["config:*", "dashboard"],
        vec!["**", " dashboard : view "],
    ]
}

fn builtin_context(principal: Principal) -> AccessContext {
    AccessContext::new(Some(principal), Arc::new(RoleRegistry::builtin()))
}

// =============================================================================
// Permission matching
// =============================================================================

#[test]
fn test_global_grant_allows_every_well_formed_query() {
    for query in ["dashboard:view", "config:admin", "x:y", "sessions:*"] {
        assert!(has_permission(&["*"], query), "{query}");
    }
    assert!(!has_permission(&["*"], "*"));
    assert!(!has_permission(&["*"], "not a permission"));
}

#[test]
fn test_scope_wildcard() {
    for action in ["view", "edit", "create", "delete", "export"] {
        assert!(has_permission(&["dashboard:*"], &format!("dashboard:{action}")));
    }
    assert!(!has_permission(&["dashboard:*"], "sessions:view"));
}

#[test]
fn test_scope_wildcard_covers_admin_action() {
    assert!(has_permission(&["sessions:*"], "sessions:admin"));
    assert!(has_permission(&["ged_network_scan:*"], "ged_network_scan:admin"));

    let grants = GrantSet::from_strings(&["sessions:*"]);
    assert!(!module_actions("sessions", &grants).contains(&Action::Admin));

    let registry = RoleRegistry::builtin();
    let mut perms: Vec<&str> = BuiltinRole::GedSpecialist
        .default_permissions()
        .iter()
        .copied()
        .filter(|p| !p.ends_with(":admin"))
        .collect();
    perms.extend(["ged_network_scan:*", "ged_index_manage:*"]);
    assert_eq!(
        registry
            .infer(&GrantSet::from_strings(&perms))
            .map(|r| r.id.as_str()),
        Some("ged_specialist")
    );
}

#[test]
fn test_exact_match_and_implication() {
    assert!(has_permission(&["sessions:view"], "sessions:view"));
    assert!(!has_permission(&["sessions:view"], "sessions:edit"));
    assert!(has_permission(&["sessions:edit"], "sessions:view"));
    assert!(!has_permission(&["sessions:create"], "sessions:view"));
    assert!(!has_permission(&["loans:delete"], "loans:edit"));
}

#[test]
fn test_empty_grant_set() {
    let empty: [&str; 0] = [];
    assert!(!has_permission(&empty, "*"));
    assert!(!has_permission(&empty, "dashboard:view"));
}

#[test]
fn test_malformed_grants_never_match() {
    assert!(!has_permission(&[" dashboard : view "], "dashboard:view"));
    assert!(!has_permission(&["dashboard"], "dashboard:view"));
    assert!(!has_permission(&["**"], "dashboard:view"));
}

#[test]
fn test_any_and_all_are_or_and_and() {
    for grants in grant_sets() {
        for a in QUERIES {
            for b in QUERIES {
                let pa = has_permission(&grants, a);
                let pb = has_permission(&grants, b);
                assert_eq!(has_any_permission(&grants, &[a, b]), pa || pb, "{grants:?} {a} {b}");
                assert_eq!(has_all_permissions(&grants, &[a, b]), pa && pb, "{grants:?} {a} {b}");
            }
        }
    }
}

#[test]
fn test_empty_requirement_lists() {
    let none: [&str; 0] = [];
    for grants in grant_sets() {
        assert!(!has_any_permission(&grants, &none));
        assert!(!has_all_permissions(&grants, &none));
    }
    let empty: [&str; 0] = [];
    assert!(!has_all_permissions(&empty, &["dashboard:view"]));
    assert!(!has_all_permissions(&empty, &["dashboard:view", "*"]));
}

// =============================================================================
// Module gating
// =============================================================================

#[test]
fn test_module_scenario_with_scope_wildcards() {
    let grants = GrantSet::from_strings(&["dashboard:view", "sessions:*", "loans:*"]);
    let registry = ModuleRegistry::builtin();

    assert_eq!(
        module_actions("sessions", &grants),
        vec![Action::View, Action::Create, Action::Edit, Action::Delete, Action::Export]
    );
    assert!(!registry.can_access("users", &grants));

    let ids: Vec<&str> = registry.accessible(&grants).iter().map(|m| m.id).collect();
    assert_eq!(ids, ["dashboard", "sessions", "loans"]);
}

#[test]
fn test_accessible_modules_preserve_order_and_filter_exactly() {
    let registry = ModuleRegistry::builtin();
    for grants in grant_sets() {
        let grants = GrantSet::from_strings(&grants);
        let expected: Vec<&str> = registry
            .iter()
            .filter(|m| grants.has(m.required_permission))
            .map(|m| m.id)
            .collect();
        let actual: Vec<&str> = registry.accessible(&grants).iter().map(|m| m.id).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_unknown_module() {
    let ctx = builtin_context(Principal::new("root").with_super_admin());
    assert!(!ctx.can_access_module("billing"));
    assert!(ctx.can_access_module("AI_ASSISTANT"));

    let ctx = builtin_context(Principal::new("v").with_role("viewer"));
    assert!(ctx.module_actions("billing").is_empty());
}

// =============================================================================
// Registry consistency
// =============================================================================

#[test]
fn test_role_permissions_open_the_modules_they_satisfy() {
    let modules = ModuleRegistry::builtin();
    for role in RoleRegistry::builtin().iter() {
        let grants = role.grant_set();
        let accessible: Vec<&str> = modules.accessible(&grants).iter().map(|m| m.id).collect();
        for module in modules.iter() {
            if has_permission(&role.permissions, module.required_permission) {
                assert!(accessible.contains(&module.id), "{} {}", role.id, module.id);
            }
        }
    }
}

#[test]
fn test_builtin_roles_infer_themselves() {
    let registry = RoleRegistry::builtin();
    for role in BuiltinRole::ALL {
        let grants = GrantSet::from_strings(role.default_permissions());
        assert_eq!(
            registry.infer(&grants).map(|r| r.id.as_str()),
            Some(role.as_str())
        );
    }
}

#[test]
fn test_technician_expectations() {
    let ctx = builtin_context(Principal::new("tech").with_role("technician"));

    assert!(ctx.has_all_permissions(&["dashboard:view", "sessions:view", "sessions:edit"]));
    assert!(!ctx.has_permission("sessions:delete"));
    assert!(!ctx.has_permission("users:view"));
    assert!(!ctx.is_admin());
    assert!(!ctx.is_super_admin());

    let ids: Vec<&str> = ctx.accessible_modules().iter().map(|m| m.id).collect();
    assert_eq!(ids, ["dashboard", "sessions", "loans", "ai_assistant"]);
    assert_eq!(ctx.module_actions("sessions"), vec![Action::View, Action::Edit]);
    assert_eq!(ctx.module_actions("loans"), vec![Action::View, Action::Create]);
}

// =============================================================================
// Principal resolution
// =============================================================================

#[test]
fn test_principal_json_end_to_end() {
    let principal: Principal = serde_json::from_str(
        r#"{"id": "7", "username": "legacy", "can_access_rds_sessions": 1, "can_manage_users": 1}"#,
    )
    .unwrap();
    let ctx = builtin_context(principal);

    assert_eq!(ctx.grant_source(), Some(GrantSource::LegacyFlags));
    assert!(ctx.has_permission("users:delete"));
    assert!(!ctx.has_permission("users:admin"));
    assert!(ctx.can_access_module("sessions"));
    assert!(!ctx.can_access_module("dashboard"));
}

#[test]
fn test_configured_roles_replace_builtin_permissions() {
    let config = AccessConfig::from_json(
        r#"{"roles": {"technician": {"priority": 60, "permissions": ["servers:*"]}}}"#,
    )
    .unwrap();
    let ctx = AccessContext::new(
        Some(Principal::new("t").with_role("technician")),
        Arc::new(config.role_registry()),
    );

    let role = ctx.user_role().unwrap();
    assert_eq!(role.display_name, "Technicien");
    assert_eq!(role.priority, 60);
    assert!(ctx.has_permission("servers:edit"));
    assert!(!ctx.has_permission("sessions:view"));
    assert_eq!(
        ctx.accessible_modules().iter().map(|m| m.id).collect::<Vec<_>>(),
        ["servers"]
    );
}

#[test]
fn test_incomplete_configuration_keeps_builtin_roles() {
    let config = AccessConfig::from_json(r#"{"roles": {}}"#).unwrap();
    let roles = Arc::new(config.role_registry());
    let technician = BuiltinRole::Technician.default_permissions();

    let explicit = AccessContext::new(
        Some(
            Principal::new("tech")
                .with_role("technician")
                .with_permissions(technician.iter().copied()),
        ),
        Arc::clone(&roles),
    );
    assert_eq!(explicit.user_role().map(|r| r.id.as_str()), Some("technician"));

    let inferred = AccessContext::new(
        Some(Principal::new("tech").with_permissions(technician.iter().copied())),
        roles,
    );
    assert_eq!(inferred.user_role().map(|r| r.id.as_str()), Some("technician"));
}

#[test]
fn test_legacy_fallback_grant() {
    let ctx = builtin_context(
        Principal::new("l")
            .with_legacy_flag(LegacyFlag::CanAccessLoans, false)
            .with_role("admin"),
    );
    assert_eq!(ctx.grants().to_vec(), vec!["dashboard:view"]);
    assert_eq!(ctx.user_role().map(|r| r.id.as_str()), Some("admin"));
}

// =============================================================================
// Concurrent evaluation
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_observe_partial_snapshots() {
    let service = Arc::new(AccessService::default());
    service.set_principal(Some(Principal::new("technician").with_role("technician")));

    let writer = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            for i in 0..200 {
                let role = if i % 2 == 0 { "viewer" } else { "technician" };
                service.set_principal(Some(Principal::new(role).with_role(role)));
                if i % 50 == 0 {
                    service.set_config(&AccessConfig::default());
                }
                tokio::task::yield_now().await;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                for _ in 0..500 {
                    let ctx = service.context();
                    let principal = ctx.principal().map(|p| p.id.clone());
                    let role = ctx.user_role().map(|r| r.id.clone());
                    assert_eq!(principal, role);
                    assert_eq!(
                        ctx.has_permission("sessions:edit"),
                        role.as_deref() == Some("technician")
                    );
                    assert!(ctx.can_access_module("dashboard"));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
}
