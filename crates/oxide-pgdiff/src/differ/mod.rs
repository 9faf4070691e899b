//! Attribute differs.
//!
//! The driver in this module is shared by every kind: it matches two
//! snapshots, emits DROP for dropped objects, the full CREATE sequence for
//! created objects, and the minimal ALTER / COMMENT / OWNER / privilege
//! statements for common pairs. Kinds plug in through [`ObjectDiffer`],
//! which supplies only the statement shapes that differ between kinds.

mod rule;
mod server;
mod statistics;
mod trigger;

use std::io::Write;

use tracing::{debug, warn};

use crate::catalog::CatalogItem;
use crate::config::DiffConfig;
use crate::emitter::DdlWriter;
use crate::error::{DiffError, Result};
use crate::format::{PostgresFormatter, SqlFormatter};
use crate::matcher::match_snapshots;
use crate::privileges::{AclDiffer, PrivilegeDiffer, PrivilegeRequest};
use crate::snapshot::Snapshot;

static DEFAULT_FORMATTER: PostgresFormatter = PostgresFormatter::new();
static DEFAULT_PRIVILEGES: AclDiffer = AclDiffer::new();

/// Collaborators and configuration for one diff run.
#[derive(Clone, Copy)]
pub struct DiffContext<'a> {
    /// Category toggles.
    pub config: &'a DiffConfig,
    /// Identifier and literal quoting.
    pub formatter: &'a dyn SqlFormatter,
    /// Privilege differ.
    pub privileges: &'a dyn PrivilegeDiffer,
}

impl<'a> DiffContext<'a> {
    /// Creates a context with the PostgreSQL formatter and the ACL differ.
    #[must_use]
    pub fn new(config: &'a DiffConfig) -> Self {
        Self {
            config,
            formatter: &DEFAULT_FORMATTER,
            privileges: &DEFAULT_PRIVILEGES,
        }
    }

    /// Replaces the formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: &'a dyn SqlFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replaces the privilege differ.
    #[must_use]
    pub fn with_privileges(mut self, privileges: &'a dyn PrivilegeDiffer) -> Self {
        self.privileges = privileges;
        self
    }
}

impl std::fmt::Debug for DiffContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffContext")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

/// Kind-specific statement shapes.
pub trait ObjectDiffer: CatalogItem {
    /// Formatted reference used after the kind keyword, e.g. `r ON s.t`.
    fn object_ref(&self, fmt: &dyn SqlFormatter) -> String;

    /// The CREATE statement(s), without comment, owner or privileges.
    fn create_statements(&self, ctx: &DiffContext<'_>) -> Result<Vec<String>>;

    /// `DROP <KIND> <ref>`.
    fn drop_statement(&self, fmt: &dyn SqlFormatter) -> String {
        format!("DROP {} {}", Self::KIND.keyword(), self.object_ref(fmt))
    }

    /// RENAME statement for kinds that can be renamed in place.
    ///
    /// Identities include the name, so [`diff_kind`] never pairs objects
    /// whose names differ. Only callers that pair objects explicitly and
    /// hand them to [`diff_pair`] reach this.
    fn rename_statement(_old: &Self, _new: &Self, _fmt: &dyn SqlFormatter) -> Option<String> {
        None
    }

    /// Kind-specific ALTER statements for a common pair, emitted after the
    /// owner change and before privileges.
    fn alter_statements(_old: &Self, _new: &Self, _ctx: &DiffContext<'_>) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Change of an optional attribute between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState<'a> {
    /// Nothing to do.
    Unchanged,
    /// Set to the new value.
    Set(&'a str),
    /// Clear the value.
    Unset,
}

impl<'a> TriState<'a> {
    /// Compares two optional values without collapsing absent into empty.
    #[must_use]
    pub fn between(old: Option<&str>, new: Option<&'a str>) -> Self {
        match (old, new) {
            (None, None) => Self::Unchanged,
            (_, Some(b)) if old == Some(b) => Self::Unchanged,
            (_, Some(b)) => Self::Set(b),
            (Some(_), None) => Self::Unset,
        }
    }

    /// Renders the value as a literal, or `NULL` when unset.
    ///
    /// Returns `None` when unchanged.
    #[must_use]
    pub fn literal(self, fmt: &dyn SqlFormatter) -> Option<String> {
        match self {
            Self::Unchanged => None,
            Self::Set(value) => Some(fmt.quote_literal(value)),
            Self::Unset => Some("NULL".to_string()),
        }
    }
}

fn comment_statement<T: ObjectDiffer>(object: &T, value: &str, fmt: &dyn SqlFormatter) -> String {
    format!(
        "COMMENT ON {} {} IS {}",
        T::KIND.keyword(),
        object.object_ref(fmt),
        value
    )
}

fn owner_statement<T: ObjectDiffer>(object: &T, owner: &str, fmt: &dyn SqlFormatter) -> String {
    format!(
        "ALTER {} {} OWNER TO {}",
        T::KIND.keyword(),
        object.object_ref(fmt),
        fmt.quote_ident(owner)
    )
}

/// Statements that create `object`: CREATE, then COMMENT, OWNER and
/// privileges as enabled.
pub fn create_object<T: ObjectDiffer>(object: &T, ctx: &DiffContext<'_>) -> Result<Vec<String>> {
    let fmt = ctx.formatter;
    let mut statements = object.create_statements(ctx)?;

    if T::HAS_COMMENT && ctx.config.comment {
        if let Some(comment) = object.comment() {
            statements.push(comment_statement(object, &fmt.quote_literal(comment), fmt));
        }
    }

    if T::HAS_OWNER && ctx.config.owner {
        if let Some(owner) = object.owner() {
            statements.push(owner_statement(object, owner, fmt));
        }
    }

    if T::HAS_ACL && ctx.config.privileges && object.acl().is_some() {
        let object_ref = object.object_ref(fmt);
        let owner = object.owner().unwrap_or_default();
        let request = PrivilegeRequest {
            kind: T::KIND,
            old_ref: &object_ref,
            new_ref: &object_ref,
            old_acl: None,
            new_acl: object.acl(),
            old_owner: owner,
            new_owner: owner,
            owner_transferred: false,
        };
        statements.extend(ctx.privileges.diff_privileges(&request, fmt)?);
    }

    Ok(statements)
}

/// Statements that turn `old` into `new` for an identity-matched pair.
pub fn diff_pair<T: ObjectDiffer>(old: &T, new: &T, ctx: &DiffContext<'_>) -> Result<Vec<String>> {
    let fmt = ctx.formatter;
    let mut statements = Vec::new();

    if let Some(rename) = T::rename_statement(old, new, fmt) {
        statements.push(rename);
    }

    if T::HAS_COMMENT && ctx.config.comment {
        if let Some(value) = TriState::between(old.comment(), new.comment()).literal(fmt) {
            statements.push(comment_statement(new, &value, fmt));
        }
    }

    let mut owner_transferred = false;
    if T::HAS_OWNER && ctx.config.owner {
        if let (Some(a), Some(b)) = (old.owner(), new.owner()) {
            if a != b {
                statements.push(owner_statement(new, b, fmt));
                owner_transferred = true;
            }
        }
    }

    statements.extend(T::alter_statements(old, new, ctx)?);

    if T::HAS_ACL && ctx.config.privileges && (old.acl().is_some() || new.acl().is_some()) {
        let old_ref = old.object_ref(fmt);
        let new_ref = new.object_ref(fmt);
        let request = PrivilegeRequest {
            kind: T::KIND,
            old_ref: &old_ref,
            new_ref: &new_ref,
            old_acl: old.acl(),
            new_acl: new.acl(),
            old_owner: old.owner().unwrap_or_default(),
            new_owner: new.owner().unwrap_or_default(),
            owner_transferred,
        };
        statements.extend(ctx.privileges.diff_privileges(&request, fmt)?);
    }

    Ok(statements)
}

/// Outcome of diffing one kind.
#[derive(Debug, Default)]
pub struct KindReport {
    /// Number of dropped objects.
    pub dropped: usize,
    /// Number of created objects.
    pub created: usize,
    /// Number of common pairs that produced at least one statement.
    pub altered: usize,
    /// Number of statements written.
    pub statements: usize,
    /// Per-object failures; the failing objects produced no statements.
    pub errors: Vec<DiffError>,
}

impl KindReport {
    /// Returns true if every object was diffed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Diffs two snapshots of one kind and writes the statements.
///
/// Object-level failures are collected in the report and do not stop the
/// pass; only a failing sink aborts it.
pub fn diff_kind<T, W>(
    old: &Snapshot<T>,
    new: &Snapshot<T>,
    ctx: &DiffContext<'_>,
    writer: &mut DdlWriter<W>,
) -> Result<KindReport>
where
    T: ObjectDiffer,
    W: Write,
{
    let matched = match_snapshots(old, new);
    let mut report = KindReport::default();
    let start = writer.written();

    for object in matched.dropped {
        debug!(kind = %T::KIND, identity = %object.key(), "Dropping");
        writer.statement(&object.drop_statement(ctx.formatter))?;
        report.dropped += 1;
    }

    for object in matched.created {
        debug!(kind = %T::KIND, identity = %object.key(), "Creating");
        match create_object(object, ctx) {
            Ok(statements) => {
                writer.statements(&statements)?;
                report.created += 1;
            }
            Err(e) => record_failure(&mut report, e, object),
        }
    }

    for (a, b) in matched.common {
        match diff_pair(a, b, ctx) {
            Ok(statements) if statements.is_empty() => {}
            Ok(statements) => {
                debug!(
                    kind = %T::KIND,
                    identity = %b.key(),
                    statements = statements.len(),
                    "Altering"
                );
                writer.statements(&statements)?;
                report.altered += 1;
            }
            Err(e) => record_failure(&mut report, e, b),
        }
    }

    report.statements = writer.written() - start;
    Ok(report)
}

fn record_failure<T: CatalogItem>(report: &mut KindReport, error: DiffError, object: &T) {
    warn!(
        kind = %T::KIND,
        identity = %object.key(),
        oid = object.oid(),
        error = %error,
        "Skipping object"
    );
    report.errors.push(error.for_object(T::KIND, object.key()));
}
