//! # Permissions
//!
//! Permission string parsing and grant-set matching.
//!
//! A permission string is one of:
//! - `*`: the global wildcard
//! - `scope:action`: an exact grant
//! - `scope:*`: every action within a scope
//!
//! `scope` and `action` are restricted to `[A-Za-z0-9_]+`. Anything else is
//! malformed and parses to [`PermissionToken::Invalid`], which never matches,
//! whether it appears as a grant or as a query.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::actions::Action;

const WILDCARD: &str = "*";

/// A parsed permission string.
///
/// Parsing is total: every input maps to exactly one variant.
///
/// # Example
///
/// ```
/// use console_rbac::permissions::PermissionToken;
///
/// assert_eq!(PermissionToken::parse("*"), PermissionToken::Global);
/// assert_eq!(
///     PermissionToken::parse("sessions:edit"),
///     PermissionToken::Scoped { scope: "sessions".into(), action: "edit".into() },
/// );
/// assert_eq!(
///     PermissionToken::parse("loans:*"),
///     PermissionToken::ScopedWildcard { scope: "loans".into() },
/// );
/// assert_eq!(PermissionToken::parse("dashboard"), PermissionToken::Invalid);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionToken {
    /// `*`, grants everything.
    Global,
    /// `scope:action`.
    Scoped {
        /// Functional area, usually a module id.
        scope: String,
        /// Operation within the scope.
        action: String,
    },
    /// `scope:*`.
    ScopedWildcard {
        /// Functional area covered by the wildcard.
        scope: String,
    },
    /// Malformed input. Matches nothing.
    Invalid,
}

impl PermissionToken {
    /// Parse a raw permission string.
    pub fn parse(s: &str) -> Self {
        if s == WILDCARD {
            return Self::Global;
        }

        let Some((scope, action)) = s.split_once(':') else {
            return Self::Invalid;
        };
        if !is_segment(scope) {
            return Self::Invalid;
        }

        if action == WILDCARD {
            Self::ScopedWildcard {
                scope: scope.to_string(),
            }
        } else if is_segment(action) {
            Self::Scoped {
                scope: scope.to_string(),
                action: action.to_string(),
            }
        } else {
            Self::Invalid
        }
    }

    /// Build an exact token for a vocabulary action.
    pub fn scoped(scope: impl Into<String>, action: Action) -> Self {
        Self::Scoped {
            scope: scope.into(),
            action: action.as_str().to_string(),
        }
    }

    /// Check if the token is well-formed.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Get the scope segment, if the token has one.
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Scoped { scope, .. } | Self::ScopedWildcard { scope } => Some(scope),
            Self::Global | Self::Invalid => None,
        }
    }

    /// Check if this token, held as a grant, satisfies `query`.
    ///
    /// Rules, in order:
    /// 1. An invalid token on either side never matches; `*` is never a valid query.
    /// 2. A global grant satisfies every query.
    /// 3. An exact grant satisfies the identical query.
    /// 4. A scope wildcard satisfies any query in its scope.
    /// 5. `scope:edit` satisfies `scope:view`.
    ///
    /// # Example
    ///
    /// ```
    /// use console_rbac::permissions::PermissionToken;
    ///
    /// let grant = PermissionToken::parse("sessions:edit");
    /// assert!(grant.grants(&PermissionToken::parse("sessions:view")));
    /// assert!(!grant.grants(&PermissionToken::parse("sessions:delete")));
    /// ```
    pub fn grants(&self, query: &PermissionToken) -> bool {
        match (self, query) {
            (Self::Invalid, _) | (_, Self::Invalid) | (_, Self::Global) => false,
            (Self::Global, _) => true,

            (
                Self::Scoped { scope, action },
                Self::Scoped {
                    scope: q_scope,
                    action: q_action,
                },
            ) => {
                scope == q_scope
                    && (action == q_action
                        || (q_action == Action::View.as_str()
                            && Action::segment_implies_view(action)))
            }
            (Self::Scoped { .. }, Self::ScopedWildcard { .. }) => false,

            (
                Self::ScopedWildcard { scope },
                Self::Scoped { scope: q_scope, .. },
            ) => scope == q_scope,
            (Self::ScopedWildcard { scope }, Self::ScopedWildcard { scope: q_scope }) => {
                scope == q_scope
            }
        }
    }
}

impl fmt::Display for PermissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str(WILDCARD),
            Self::Scoped { scope, action } => write!(f, "{}:{}", scope, action),
            Self::ScopedWildcard { scope } => write!(f, "{}:{}", scope, WILDCARD),
            Self::Invalid => f.write_str("<invalid>"),
        }
    }
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// The set of permission strings a principal holds at evaluation time.
///
/// Raw strings are kept in insertion order (duplicates dropped) for display;
/// well-formed entries are parsed once and cached alongside. Malformed
/// entries are retained verbatim but never take part in matching.
///
/// # Example
///
/// ```
/// use console_rbac::permissions::GrantSet;
///
/// let set = GrantSet::from_strings(&["dashboard:view", "sessions:*", "loans:edit"]);
///
/// assert!(set.has("sessions:delete"));
/// assert!(set.has("loans:view")); // edit implies view
/// assert!(!set.has("users:view"));
/// assert_eq!(set.len(), 3);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct GrantSet {
    /// Raw permission strings, first occurrence order.
    raw: Vec<String>,
    /// Parsed, well-formed grants.
    tokens: Vec<PermissionToken>,
    /// Membership index over `raw`.
    seen: HashSet<String>,
}

impl GrantSet {
    /// Create a new empty grant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grant set holding only the global wildcard.
    pub fn global() -> Self {
        Self::from_strings(&[WILDCARD])
    }

    /// Create from a list of permission strings.
    pub fn from_strings<I, S>(perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend(perms.into_iter().map(|p| p.as_ref().to_string()));
        set
    }

    /// Add a permission string.
    ///
    /// # Returns
    ///
    /// `true` if the string was not already present.
    pub fn insert(&mut self, permission: impl Into<String>) -> bool {
        let permission = permission.into();
        if self.seen.contains(&permission) {
            return false;
        }

        let token = PermissionToken::parse(&permission);
        if token.is_valid() {
            self.tokens.push(token);
        } else {
            tracing::debug!(permission = %permission, "Ignoring malformed permission grant");
        }
        self.seen.insert(permission.clone());
        self.raw.push(permission);
        true
    }

    /// Merge another grant set into this one.
    pub fn merge(&mut self, other: &GrantSet) {
        self.extend(other.raw.iter().cloned());
    }

    /// Check if the set grants `query`.
    ///
    /// Never fails: malformed queries, the bare `*` query, and empty sets
    /// all yield `false`.
    pub fn has(&self, query: &str) -> bool {
        let query = PermissionToken::parse(query);
        if !query.is_valid() {
            tracing::debug!("Rejecting malformed permission query");
            return false;
        }
        self.has_token(&query)
    }

    /// Check a pre-parsed query.
    pub fn has_token(&self, query: &PermissionToken) -> bool {
        self.tokens.iter().any(|grant| grant.grants(query))
    }

    /// Check if at least one query is granted. Empty `queries` yields `false`.
    pub fn has_any<S: AsRef<str>>(&self, queries: &[S]) -> bool {
        queries.iter().any(|q| self.has(q.as_ref()))
    }

    /// Check if every query is granted. Empty `queries` yields `false`.
    pub fn has_all<S: AsRef<str>>(&self, queries: &[S]) -> bool {
        !queries.is_empty() && queries.iter().all(|q| self.has(q.as_ref()))
    }

    /// Check if the set holds the global wildcard.
    pub fn contains_global(&self) -> bool {
        self.tokens.contains(&PermissionToken::Global)
    }

    /// Check if a raw string is present verbatim.
    pub fn contains(&self, permission: &str) -> bool {
        self.seen.contains(permission)
    }

    /// Iterate raw permission strings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.raw.iter().map(String::as_str)
    }

    /// Iterate well-formed parsed grants.
    pub fn tokens(&self) -> &[PermissionToken] {
        &self.tokens
    }

    /// Get the count of distinct raw permission strings.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Get the raw permission strings.
    pub fn to_vec(&self) -> Vec<String> {
        self.raw.clone()
    }
}

impl Extend<String> for GrantSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        for perm in iter {
            self.insert(perm);
        }
    }
}

impl FromIterator<String> for GrantSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut set = GrantSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> FromIterator<&'a str> for GrantSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl From<Vec<String>> for GrantSet {
    fn from(perms: Vec<String>) -> Self {
        perms.into_iter().collect()
    }
}

impl From<GrantSet> for Vec<String> {
    fn from(set: GrantSet) -> Self {
        set.raw
    }
}

impl PartialEq for GrantSet {
    /// Grant sets are unordered: equality ignores insertion order.
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Eq for GrantSet {}

/// Check a single query against raw grants.
///
/// # Example
///
/// ```
/// use console_rbac::permissions::has_permission;
///
/// assert!(has_permission(&["*"], "config:admin"));
/// assert!(!has_permission(&["*"], "*"));
/// assert!(!has_permission::<&str>(&[], "dashboard:view"));
/// ```
pub fn has_permission<S: AsRef<str>>(grants: &[S], query: &str) -> bool {
    GrantSet::from_strings(grants).has(query)
}

/// Logical OR of [`has_permission`] over `queries`.
pub fn has_any_permission<S: AsRef<str>, Q: AsRef<str>>(grants: &[S], queries: &[Q]) -> bool {
    GrantSet::from_strings(grants).has_any(queries)
}

/// Logical AND of [`has_permission`] over `queries`; empty `queries` is never satisfied.
pub fn has_all_permissions<S: AsRef<str>, Q: AsRef<str>>(grants: &[S], queries: &[Q]) -> bool {
    GrantSet::from_strings(grants).has_all(queries)
}
