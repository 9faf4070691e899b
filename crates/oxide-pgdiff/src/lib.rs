//! Schema-object diffing and DDL synthesis for PostgreSQL catalogs.
//!
//! `oxide-pgdiff` compares two catalog snapshots (a source and a target)
//! and writes the DDL script that turns the source into the target. It
//! covers rules, foreign servers, extended statistics and triggers:
//! - Objects are matched by identity with a sorted merge, never by OID
//! - Optional attributes keep absent distinct from empty
//! - Foreign server option lists are reconciled into DROP / SET / ADD
//! - Comments, ownership, options and privileges can each be turned off
//!
//! # Architecture
//!
//! - **Catalog** - Typed object records and their capabilities
//! - **Snapshot** - Identity-sorted object lists and the readers that build them
//! - **Matcher** - Two-cursor merge into dropped / created / common
//! - **Options** - `key=value` list parsing and delta computation
//! - **Differ** - Per-kind statement shapes over a shared driver
//! - **Emitter** - Statement framing
//! - **Orchestrator** - Runs every kind and isolates failures
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_pgdiff::prelude::*;
//!
//! let source = JsonCatalog::load("prod.json")?;
//! let target = JsonCatalog::load("dev.json")?;
//!
//! let config = DiffConfig::new().with_privileges(false);
//! let ctx = DiffContext::new(&config);
//! let mut writer = DdlWriter::new(std::io::stdout());
//!
//! diff_catalogs(&source, &target, &ctx, &ObjectKind::ALL, &mut writer)?.into_result()?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the script turning prod into dev
//! oxide-pgdiff --source prod.json --target dev.json
//!
//! # Only servers, without privileges, into a file
//! oxide-pgdiff -s prod.json -t dev.json --kinds server --no-privileges -o diff.sql
//! ```

pub mod catalog;
pub mod config;
pub mod differ;
pub mod emitter;
pub mod error;
pub mod format;
pub mod identity;
pub mod matcher;
pub mod options;
pub mod orchestrator;
pub mod privileges;
pub mod snapshot;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{
        CatalogItem, CatalogObject, ExtendedStatistics, ForeignServer, ObjectKind, Rule, Trigger,
    };
    pub use crate::config::{DiffConfig, OptionClauses};
    pub use crate::differ::{
        DiffContext, KindReport, ObjectDiffer, create_object, diff_kind, diff_pair,
    };
    pub use crate::emitter::DdlWriter;
    pub use crate::error::{DiffError, Result};
    pub use crate::format::{PostgresFormatter, SqlFormatter};
    pub use crate::identity::{ObjectIdentity, TableMemberIdentity};
    pub use crate::matcher::{Matched, match_snapshots};
    pub use crate::options::{OptionDelta, OptionList};
    pub use crate::orchestrator::{DiffReport, diff_catalogs};
    pub use crate::privileges::{AclDiffer, NoPrivileges, PrivilegeDiffer};
    pub use crate::snapshot::{CatalogReader, JsonCatalog, Snapshot};
}
