//! Object identities.
//!
//! Identities are compared lexicographically on `(schema, name)`, which is
//! the byte order the catalog itself sorts by. Global objects (foreign
//! servers) carry no schema and sort before any schema-scoped identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a schema-scoped or global catalog object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    /// Schema name, `None` for global objects.
    #[serde(default)]
    pub schema: Option<String>,
    /// Object name.
    pub name: String,
}

impl ObjectIdentity {
    /// Creates a schema-scoped identity.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Creates a global identity (no schema).
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Identity of an object that lives on a table (rules, triggers).
///
/// Field order matters: the derived ordering sorts by owning table first,
/// then by member name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableMemberIdentity {
    /// The owning table.
    pub table: ObjectIdentity,
    /// Rule or trigger name.
    pub name: String,
}

impl fmt::Display for TableMemberIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ON {}", self.name, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_then_name_ordering() {
        let mut ids = vec![
            ObjectIdentity::new("public", "b"),
            ObjectIdentity::new("audit", "z"),
            ObjectIdentity::new("public", "a"),
        ];
        ids.sort();
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["audit.z", "public.a", "public.b"]);
    }

    #[test]
    fn test_byte_order_is_case_sensitive() {
        assert!(ObjectIdentity::global("Zeta") < ObjectIdentity::global("alpha"));
    }

    #[test]
    fn test_member_identity_sorts_by_table_first() {
        let a = TableMemberIdentity {
            table: ObjectIdentity::new("s", "a"),
            name: "z".to_string(),
        };
        let b = TableMemberIdentity {
            table: ObjectIdentity::new("s", "b"),
            name: "a".to_string(),
        };
        assert!(a < b);
        assert_eq!(a.to_string(), "z ON s.a");
    }
}
