//! Triggers.

use crate::catalog::{CatalogItem, Trigger};
use crate::error::Result;
use crate::format::SqlFormatter;

use super::{DiffContext, ObjectDiffer};

impl ObjectDiffer for Trigger {
    fn object_ref(&self, fmt: &dyn SqlFormatter) -> String {
        fmt.on_table(&self.key())
    }

    fn create_statements(&self, _ctx: &DiffContext<'_>) -> Result<Vec<String>> {
        Ok(vec![self.definition.clone()])
    }

    fn rename_statement(old: &Self, new: &Self, fmt: &dyn SqlFormatter) -> Option<String> {
        (old.name != new.name).then(|| {
            format!(
                "ALTER TRIGGER {} RENAME TO {}",
                old.object_ref(fmt),
                fmt.quote_ident(&new.name)
            )
        })
    }
}
