//! Whole-catalog diff.
//!
//! Runs the per-kind driver for every requested kind in a fixed order and
//! isolates failures: a kind whose snapshot cannot be read is skipped, an
//! object that cannot be diffed is skipped, and everything else is still
//! written.

use std::io::Write;

use tracing::{info, warn};

use crate::catalog::ObjectKind;
use crate::differ::{DiffContext, KindReport, ObjectDiffer, diff_kind};
use crate::emitter::DdlWriter;
use crate::error::{DiffError, Result};
use crate::snapshot::{CatalogReader, Snapshot};

/// Outcome of a whole-catalog diff.
#[derive(Debug, Default)]
pub struct DiffReport {
    /// Per-kind results, in the order the kinds ran.
    pub kinds: Vec<(ObjectKind, KindReport)>,
    /// Kinds that were skipped because a snapshot could not be read.
    pub errors: Vec<DiffError>,
}

impl DiffReport {
    /// Returns the report for a kind, if it ran.
    #[must_use]
    pub fn kind(&self, kind: ObjectKind) -> Option<&KindReport> {
        self.kinds.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }

    /// Total number of statements written.
    #[must_use]
    pub fn statements(&self) -> usize {
        self.kinds.iter().map(|(_, r)| r.statements).sum()
    }

    /// Returns true if no snapshot and no object failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.kinds.iter().all(|(_, r)| r.is_clean())
    }

    /// Collapses all recorded failures into one error.
    pub fn into_result(self) -> Result<()> {
        let mut errors = self.errors;
        for (_, report) in self.kinds {
            errors.extend(report.errors);
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(DiffError::Multiple(errors)),
        }
    }
}

/// Diffs `source` into `target` for the requested kinds and writes the
/// script.
///
/// Kinds always run in [`ObjectKind::ALL`] order regardless of the order
/// of `kinds`. Returns an error only if the sink fails.
pub fn diff_catalogs<W: Write>(
    source: &dyn CatalogReader,
    target: &dyn CatalogReader,
    ctx: &DiffContext<'_>,
    kinds: &[ObjectKind],
    writer: &mut DdlWriter<W>,
) -> Result<DiffReport> {
    let mut report = DiffReport::default();

    for kind in ObjectKind::ALL {
        if !kinds.contains(&kind) {
            continue;
        }
        match kind {
            ObjectKind::ForeignServer => run_kind(
                source.foreign_servers(),
                target.foreign_servers(),
                ctx,
                writer,
                &mut report,
            )?,
            ObjectKind::Statistics => run_kind(
                source.statistics(),
                target.statistics(),
                ctx,
                writer,
                &mut report,
            )?,
            ObjectKind::Rule => {
                run_kind(source.rules(), target.rules(), ctx, writer, &mut report)?;
            }
            ObjectKind::Trigger => {
                run_kind(source.triggers(), target.triggers(), ctx, writer, &mut report)?;
            }
        }
    }

    writer.flush()?;

    info!(
        statements = report.statements(),
        failures = report.errors.len()
            + report.kinds.iter().map(|(_, r)| r.errors.len()).sum::<usize>(),
        "Diff complete"
    );

    Ok(report)
}

fn run_kind<T, W>(
    old: Result<Snapshot<T>>,
    new: Result<Snapshot<T>>,
    ctx: &DiffContext<'_>,
    writer: &mut DdlWriter<W>,
    report: &mut DiffReport,
) -> Result<()>
where
    T: ObjectDiffer,
    W: Write,
{
    let (old, new) = match (old, new) {
        (Ok(old), Ok(new)) => (old, new),
        (old, new) => {
            for error in [old.err(), new.err()].into_iter().flatten() {
                warn!(kind = %T::KIND, error = %error, "Skipping kind");
                report.errors.push(error.for_snapshot(T::KIND));
            }
            return Ok(());
        }
    };

    let kind_report = diff_kind(&old, &new, ctx, writer)?;
    info!(
        kind = %T::KIND,
        dropped = kind_report.dropped,
        created = kind_report.created,
        altered = kind_report.altered,
        failed = kind_report.errors.len(),
        "Diffed"
    );
    report.kinds.push((T::KIND, kind_report));
    Ok(())
}
