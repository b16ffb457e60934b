//! # Actions
//!
//! The closed action vocabulary used when enumerating what a principal may
//! do inside a module, plus the fixed implication rule between actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions that can be performed inside a module.
///
/// The vocabulary is closed and ordered; [`Action::ALL`] is the order used
/// whenever actions are listed.
///
/// - **View**: See the module and its data
/// - **Create**: Add new records
/// - **Edit**: Modify existing records
/// - **Delete**: Remove records
/// - **Export**: Download or export data
/// - **Admin**: Administer the module itself
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// View/read access.
    View,

    /// Create new records.
    Create,

    /// Edit existing records.
    ///
    /// Holding `edit` on a scope also satisfies `view` on that scope.
    Edit,

    /// Delete records.
    Delete,

    /// Export data.
    Export,

    /// Administer the module.
    ///
    /// A scope wildcard matches `scope:admin` like any other action, but
    /// module action listings only show it for an explicit `scope:admin`
    /// grant or the global `*`.
    Admin,
}

impl Action {
    /// Every action, in vocabulary order.
    pub const ALL: [Action; 6] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Export,
        Action::Admin,
    ];

    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// The action segment as it appears in a permission string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Export => "export",
            Action::Admin => "admin",
        }
    }

    /// Parse an action segment.
    ///
    /// Matching is exact: permission strings are case-sensitive and the
    /// vocabulary has no aliases.
    ///
    /// # Example
    ///
    /// ```
    /// use console_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("view"), Some(Action::View));
    /// assert_eq!(Action::parse("admin"), Some(Action::Admin));
    /// assert_eq!(Action::parse("VIEW"), None);
    /// assert_eq!(Action::parse("read"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == s)
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    /// Check if this action implies another action.
    ///
    /// The only implication is `Edit` implies `View`. `Create`, `Delete`,
    /// `Export` and `Admin` imply nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use console_rbac::actions::Action;
    ///
    /// assert!(Action::Edit.implies(Action::View));
    /// assert!(!Action::Create.implies(Action::View));
    /// assert!(!Action::Admin.implies(Action::Edit));
    /// ```
    pub fn implies(&self, other: Action) -> bool {
        matches!((self, other), (Action::Edit, Action::View))
    }

    /// Check if the action is reserved: listed for a module only when granted
    /// explicitly or globally, never through `scope:*` alone.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Action::Admin)
    }

    /// Whether an action segment (known or not) implies `view`.
    pub(crate) fn segment_implies_view(segment: &str) -> bool {
        Action::parse(segment).is_some_and(|action| action.implies(Action::View))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("view"), Some(Action::View));
        assert_eq!(Action::parse("create"), Some(Action::Create));
        assert_eq!(Action::parse("edit"), Some(Action::Edit));
        assert_eq!(Action::parse("delete"), Some(Action::Delete));
        assert_eq!(Action::parse("export"), Some(Action::Export));
        assert_eq!(Action::parse("admin"), Some(Action::Admin));

        assert_eq!(Action::parse("Edit"), None);
        assert_eq!(Action::parse("write"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn test_action_as_str() {
        for action in Action::ALL {
            assert_eq!(action.to_string(), action.as_str());
        }
        assert_eq!(Action::Export.as_str(), "export");
    }

    #[test]
    fn test_action_implies() {
        assert!(Action::Edit.implies(Action::View));

        assert!(!Action::Create.implies(Action::View));
        assert!(!Action::Delete.implies(Action::View));
        assert!(!Action::Delete.implies(Action::Edit));
        assert!(!Action::Admin.implies(Action::View));
        assert!(!Action::View.implies(Action::Edit));
        assert!(!Action::View.implies(Action::View));
    }

    #[test]
    fn test_vocabulary_order() {
        let names: Vec<&str> = Action::all().iter().map(Action::as_str).collect();
        assert_eq!(names, ["view", "create", "edit", "delete", "export", "admin"]);
    }

    #[test]
    fn test_only_admin_is_reserved() {
        let reserved: Vec<Action> = Action::ALL.into_iter().filter(Action::is_reserved).collect();
        assert_eq!(reserved, vec![Action::Admin]);
    }

    #[test]
    fn test_segment_implies_view() {
        assert!(Action::segment_implies_view("edit"));
        assert!(!Action::segment_implies_view("create"));
        assert!(!Action::segment_implies_view("approve"));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Action::Export).unwrap();
        assert_eq!(json, "\"export\"");
    }
}
