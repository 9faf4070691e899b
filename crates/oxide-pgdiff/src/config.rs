//! Diff configuration.

use serde::{Deserialize, Serialize};

/// How option list changes are grouped into statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionClauses {
    /// One `OPTIONS(...)` statement holding DROP, then SET, then ADD clauses.
    #[default]
    Combined,
    /// One statement per non-empty bucket, in DROP, SET, ADD order.
    Separate,
}

/// Toggles that suppress whole categories of statements.
///
/// Passed by reference into every differ call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Emit COMMENT statements.
    pub comment: bool,
    /// Emit OWNER TO statements.
    pub owner: bool,
    /// Emit GRANT / REVOKE statements.
    pub privileges: bool,
    /// Reconcile option lists.
    pub options: bool,
    /// Grouping of option list clauses.
    pub option_clauses: OptionClauses,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            comment: true,
            owner: true,
            privileges: true,
            options: true,
            option_clauses: OptionClauses::Combined,
        }
    }
}

impl DiffConfig {
    /// Creates the default configuration (everything enabled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables COMMENT statements.
    #[must_use]
    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.comment = enabled;
        self
    }

    /// Enables or disables OWNER TO statements.
    #[must_use]
    pub fn with_owner(mut self, enabled: bool) -> Self {
        self.owner = enabled;
        self
    }

    /// Enables or disables GRANT / REVOKE statements.
    #[must_use]
    pub fn with_privileges(mut self, enabled: bool) -> Self {
        self.privileges = enabled;
        self
    }

    /// Enables or disables option list reconciliation.
    #[must_use]
    pub fn with_options(mut self, enabled: bool) -> Self {
        self.options = enabled;
        self
    }

    /// Sets how option clauses are grouped.
    #[must_use]
    pub fn option_clauses(mut self, clauses: OptionClauses) -> Self {
        self.option_clauses = clauses;
        self
    }
}
