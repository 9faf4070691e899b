//! Catalog object representation types.
//!
//! One struct per supported kind, the closed [`CatalogObject`] enum over
//! them, and the [`CatalogItem`] capability trait that lets the matcher and
//! the generic differ work over any kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{ObjectIdentity, TableMemberIdentity};

/// The kinds of catalog objects the engine can diff.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Foreign server (global).
    #[value(name = "server")]
    ForeignServer,
    /// Extended statistics object.
    Statistics,
    /// Rewrite rule on a table.
    Rule,
    /// Trigger on a table.
    Trigger,
}

impl ObjectKind {
    /// All kinds, in the order the orchestrator runs them.
    pub const ALL: [Self; 4] = [
        Self::ForeignServer,
        Self::Statistics,
        Self::Rule,
        Self::Trigger,
    ];

    /// SQL keyword used in DROP / ALTER / COMMENT statements.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::ForeignServer => "SERVER",
            Self::Statistics => "STATISTICS",
            Self::Rule => "RULE",
            Self::Trigger => "TRIGGER",
        }
    }

    /// SQL keyword used in GRANT / REVOKE statements.
    #[must_use]
    pub const fn grant_keyword(self) -> &'static str {
        match self {
            Self::ForeignServer => "FOREIGN SERVER",
            other => other.keyword(),
        }
    }

    /// Oldest server version (`server_version_num`) whose catalog has this kind.
    #[must_use]
    pub const fn min_server_version(self) -> u32 {
        match self {
            Self::ForeignServer => 80400,
            Self::Statistics => 100_000,
            Self::Rule | Self::Trigger => 0,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Catalog oid; diagnostics only.
    #[serde(default)]
    pub oid: u32,
    /// Table the rule is attached to.
    pub table: ObjectIdentity,
    /// Rule name.
    pub name: String,
    /// Full `CREATE RULE` text as rendered by the catalog.
    pub definition: String,
    /// Comment, if one is set.
    #[serde(default)]
    pub comment: Option<String>,
}

/// A foreign server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignServer {
    /// Catalog oid; diagnostics only.
    #[serde(default)]
    pub oid: u32,
    /// Server name.
    pub name: String,
    /// Foreign data wrapper name.
    pub wrapper: String,
    /// Server type.
    #[serde(default, rename = "type")]
    pub server_type: Option<String>,
    /// Server version.
    #[serde(default)]
    pub version: Option<String>,
    /// Raw `key=value, ...` option list.
    #[serde(default)]
    pub options: Option<String>,
    /// Owning role.
    pub owner: String,
    /// Raw `aclitem[]` text.
    #[serde(default)]
    pub acl: Option<String>,
    /// Comment, if one is set.
    #[serde(default)]
    pub comment: Option<String>,
}

/// An extended statistics object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedStatistics {
    /// Catalog oid; diagnostics only.
    #[serde(default)]
    pub oid: u32,
    /// Schema-qualified identity.
    #[serde(flatten)]
    pub identity: ObjectIdentity,
    /// Full `CREATE STATISTICS` text as rendered by the catalog.
    pub definition: String,
    /// Comment, if one is set.
    #[serde(default)]
    pub comment: Option<String>,
    /// Owning role.
    pub owner: String,
}

/// A trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Catalog oid; diagnostics only.
    #[serde(default)]
    pub oid: u32,
    /// Table the trigger is attached to.
    pub table: ObjectIdentity,
    /// Trigger name.
    pub name: String,
    /// Full `CREATE TRIGGER` text as rendered by the catalog.
    pub definition: String,
    /// Comment, if one is set.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Any catalog object, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogObject {
    /// A rewrite rule.
    Rule(Rule),
    /// A foreign server.
    #[serde(rename = "server")]
    ForeignServer(ForeignServer),
    /// An extended statistics object.
    Statistics(ExtendedStatistics),
    /// A trigger.
    Trigger(Trigger),
}

impl CatalogObject {
    /// Returns the kind of this object.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::Rule(_) => ObjectKind::Rule,
            Self::ForeignServer(_) => ObjectKind::ForeignServer,
            Self::Statistics(_) => ObjectKind::Statistics,
            Self::Trigger(_) => ObjectKind::Trigger,
        }
    }

    /// Returns a printable identity.
    #[must_use]
    pub fn identity(&self) -> String {
        match self {
            Self::Rule(r) => r.key().to_string(),
            Self::ForeignServer(s) => s.key().to_string(),
            Self::Statistics(s) => s.key().to_string(),
            Self::Trigger(t) => t.key().to_string(),
        }
    }
}

/// Capability interface shared by every object kind.
///
/// The `HAS_*` flags state which optional attributes the kind carries; the
/// matching accessors return `None` for kinds without the attribute.
pub trait CatalogItem: Clone + fmt::Debug {
    /// Identity key used for matching.
    type Key: Ord + Clone + fmt::Display + fmt::Debug;

    /// The kind of this item.
    const KIND: ObjectKind;
    /// Whether the kind carries a comment.
    const HAS_COMMENT: bool = false;
    /// Whether the kind carries an owner.
    const HAS_OWNER: bool = false;
    /// Whether the kind carries an ACL.
    const HAS_ACL: bool = false;
    /// Whether the kind carries an option list.
    const HAS_OPTIONS: bool = false;

    /// Returns the identity key.
    fn key(&self) -> Self::Key;

    /// Returns the catalog oid (diagnostics only).
    fn oid(&self) -> u32;

    /// Returns the comment, if any.
    fn comment(&self) -> Option<&str> {
        None
    }

    /// Returns the owner, if the kind tracks one.
    fn owner(&self) -> Option<&str> {
        None
    }

    /// Returns the raw ACL, if any.
    fn acl(&self) -> Option<&str> {
        None
    }

    /// Returns the raw option list, if any.
    fn options(&self) -> Option<&str> {
        None
    }

    /// Extracts an item of this kind from a tagged object.
    fn from_object(object: CatalogObject) -> Option<Self>;
}

impl CatalogItem for Rule {
    type Key = TableMemberIdentity;
    const KIND: ObjectKind = ObjectKind::Rule;
    const HAS_COMMENT: bool = true;

    fn key(&self) -> Self::Key {
        TableMemberIdentity {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn oid(&self) -> u32 {
        self.oid
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn from_object(object: CatalogObject) -> Option<Self> {
        match object {
            CatalogObject::Rule(r) => Some(r),
            _ => None,
        }
    }
}

impl CatalogItem for ForeignServer {
    type Key = ObjectIdentity;
    const KIND: ObjectKind = ObjectKind::ForeignServer;
    const HAS_COMMENT: bool = true;
    const HAS_OWNER: bool = true;
    const HAS_ACL: bool = true;
    const HAS_OPTIONS: bool = true;

    fn key(&self) -> Self::Key {
        ObjectIdentity::global(self.name.clone())
    }

    fn oid(&self) -> u32 {
        self.oid
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.owner)
    }

    fn acl(&self) -> Option<&str> {
        self.acl.as_deref()
    }

    fn options(&self) -> Option<&str> {
        self.options.as_deref()
    }

    fn from_object(object: CatalogObject) -> Option<Self> {
        match object {
            CatalogObject::ForeignServer(s) => Some(s),
            _ => None,
        }
    }
}

impl CatalogItem for ExtendedStatistics {
    type Key = ObjectIdentity;
    const KIND: ObjectKind = ObjectKind::Statistics;
    const HAS_COMMENT: bool = true;
    const HAS_OWNER: bool = true;

    fn key(&self) -> Self::Key {
        self.identity.clone()
    }

    fn oid(&self) -> u32 {
        self.oid
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.owner)
    }

    fn from_object(object: CatalogObject) -> Option<Self> {
        match object {
            CatalogObject::Statistics(s) => Some(s),
            _ => None,
        }
    }
}

impl CatalogItem for Trigger {
    type Key = TableMemberIdentity;
    const KIND: ObjectKind = ObjectKind::Trigger;
    const HAS_COMMENT: bool = true;

    fn key(&self) -> Self::Key {
        TableMemberIdentity {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    fn oid(&self) -> u32 {
        self.oid
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn from_object(object: CatalogObject) -> Option<Self> {
        match object {
            CatalogObject::Trigger(t) => Some(t),
            _ => None,
        }
    }
}
