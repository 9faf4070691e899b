//! Identifier and literal quoting.
//!
//! Differs never escape anything themselves; every identifier component and
//! every string literal goes through a [`SqlFormatter`].

use crate::identity::{ObjectIdentity, TableMemberIdentity};

/// Quoting collaborator used by every differ.
pub trait SqlFormatter: Send + Sync {
    /// Quotes one identifier component.
    fn quote_ident(&self, name: &str) -> String;

    /// Quotes a string literal.
    fn quote_literal(&self, value: &str) -> String;

    /// Renders a possibly schema-qualified identity.
    fn qualified(&self, identity: &ObjectIdentity) -> String {
        match &identity.schema {
            Some(schema) => format!(
                "{}.{}",
                self.quote_ident(schema),
                self.quote_ident(&identity.name)
            ),
            None => self.quote_ident(&identity.name),
        }
    }

    /// Renders `member ON schema.table`.
    fn on_table(&self, member: &TableMemberIdentity) -> String {
        format!(
            "{} ON {}",
            self.quote_ident(&member.name),
            self.qualified(&member.table)
        )
    }
}

/// Keywords that cannot be used as bare column or object names.
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
    "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
    "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false",
    "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "initially",
    "intersect", "into", "lateral", "leading", "limit", "localtime", "localtimestamp", "not",
    "null", "offset", "on", "only", "or", "order", "placing", "primary", "references",
    "returning", "select", "session_user", "some", "symmetric", "system_user", "table", "then",
    "to", "trailing", "true", "union", "unique", "user", "using", "variadic", "when", "where",
    "window", "with",
];

/// PostgreSQL quoting rules.
///
/// Identifiers are quoted only when they would not survive unquoted: any
/// character outside `[a-z0-9_$]`, a leading digit or `$`, or a reserved
/// keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresFormatter;

impl PostgresFormatter {
    /// Creates a new formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn needs_quotes(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return true;
        };
        if !(first.is_ascii_lowercase() || first == '_') {
            return true;
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$') {
            return true;
        }
        RESERVED_KEYWORDS.binary_search(&name).is_ok()
    }
}

impl SqlFormatter for PostgresFormatter {
    fn quote_ident(&self, name: &str) -> String {
        if Self::needs_quotes(name) {
            format!("\"{}\"", name.replace('"', "\"\""))
        } else {
            name.to_string()
        }
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_sorted() {
        let mut sorted = RESERVED_KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, RESERVED_KEYWORDS);
    }

    #[test]
    fn test_plain_identifiers_stay_bare() {
        let fmt = PostgresFormatter::new();
        assert_eq!(fmt.quote_ident("orders"), "orders");
        assert_eq!(fmt.quote_ident("_tmp$1"), "_tmp$1");
    }

    #[test]
    fn test_identifiers_quoted_when_needed() {
        let fmt = PostgresFormatter::new();
        assert_eq!(fmt.quote_ident("Orders"), "\"Orders\"");
        assert_eq!(fmt.quote_ident("my table"), "\"my table\"");
        assert_eq!(fmt.quote_ident("1st"), "\"1st\"");
        assert_eq!(fmt.quote_ident("user"), "\"user\"");
        assert_eq!(fmt.quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(fmt.quote_ident(""), "\"\"");
    }

    #[test]
    fn test_literals_double_single_quotes() {
        let fmt = PostgresFormatter::new();
        assert_eq!(fmt.quote_literal("it's"), "'it''s'");
        assert_eq!(fmt.quote_literal(""), "''");
    }

    #[test]
    fn test_qualified_and_on_table() {
        let fmt = PostgresFormatter::new();
        assert_eq!(fmt.qualified(&ObjectIdentity::new("Sales", "t")), "\"Sales\".t");
        assert_eq!(fmt.qualified(&ObjectIdentity::global("srv")), "srv");

        let member = TableMemberIdentity {
            table: ObjectIdentity::new("s", "tbl"),
            name: "t1".to_string(),
        };
        assert_eq!(fmt.on_table(&member), "t1 ON s.tbl");
    }
}
