//! Extended statistics.

use crate::catalog::ExtendedStatistics;
use crate::error::Result;
use crate::format::SqlFormatter;

use super::{DiffContext, ObjectDiffer};

impl ObjectDiffer for ExtendedStatistics {
    fn object_ref(&self, fmt: &dyn SqlFormatter) -> String {
        fmt.qualified(&self.identity)
    }

    fn create_statements(&self, _ctx: &DiffContext<'_>) -> Result<Vec<String>> {
        Ok(vec![self.definition.clone()])
    }
}
