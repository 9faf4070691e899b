//! Foreign servers.
//!
//! The only kind that carries an option list and an ACL. Option changes are
//! rendered with the option algebra, privileges through the context's
//! privilege differ.

use tracing::debug;

use crate::catalog::ForeignServer;
use crate::config::OptionClauses;
use crate::error::Result;
use crate::format::SqlFormatter;
use crate::options::{OptionDelta, OptionList};

use super::{DiffContext, ObjectDiffer, TriState};

impl ObjectDiffer for ForeignServer {
    fn object_ref(&self, fmt: &dyn SqlFormatter) -> String {
        fmt.quote_ident(&self.name)
    }

    fn create_statements(&self, ctx: &DiffContext<'_>) -> Result<Vec<String>> {
        let fmt = ctx.formatter;
        let mut sql = format!("CREATE SERVER {}", self.object_ref(fmt));

        if let Some(server_type) = &self.server_type {
            sql.push_str(&format!(" TYPE {}", fmt.quote_literal(server_type)));
        }
        if let Some(version) = &self.version {
            sql.push_str(&format!(" VERSION {}", fmt.quote_literal(version)));
        }
        sql.push_str(&format!(
            " FOREIGN DATA WRAPPER {}",
            fmt.quote_ident(&self.wrapper)
        ));

        if let Some(raw) = &self.options {
            let options = OptionList::parse(raw)?;
            if !options.is_empty() {
                sql.push_str(&format!(" OPTIONS({})", options.to_create_clause(fmt)));
            }
        }

        Ok(vec![sql])
    }

    fn alter_statements(old: &Self, new: &Self, ctx: &DiffContext<'_>) -> Result<Vec<String>> {
        let fmt = ctx.formatter;
        let object_ref = new.object_ref(fmt);
        let mut statements = Vec::new();

        if old.server_type != new.server_type {
            debug!(
                server = %new.name,
                old = ?old.server_type,
                new = ?new.server_type,
                "Server type changed; not expressible as ALTER"
            );
        }

        if let Some(version) =
            TriState::between(old.version.as_deref(), new.version.as_deref()).literal(fmt)
        {
            statements.push(format!("ALTER SERVER {object_ref} VERSION {version}"));
        }

        if ctx.config.options {
            let delta = OptionDelta::between(old.options.as_deref(), new.options.as_deref())?;
            let combined = ctx.config.option_clauses == OptionClauses::Combined;
            for group in delta.clause_groups(fmt, combined) {
                statements.push(format!("ALTER SERVER {object_ref} OPTIONS({group})"));
            }
        }

        Ok(statements)
    }
}
