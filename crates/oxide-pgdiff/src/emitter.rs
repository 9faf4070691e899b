//! Statement framing.
//!
//! Every statement is written as a blank-line separator followed by the
//! statement text and a terminating semicolon. Statements are never merged.

use std::io::Write;

use crate::error::Result;

/// Writes framed DDL statements to a sink.
#[derive(Debug)]
pub struct DdlWriter<W: Write> {
    sink: W,
    written: usize,
}

impl<W: Write> DdlWriter<W> {
    /// Wraps a sink.
    pub const fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Writes one statement.
    ///
    /// A trailing semicolon already present in `sql` (as in catalog-rendered
    /// definitions) is not doubled.
    pub fn statement(&mut self, sql: &str) -> Result<()> {
        let body = sql.trim_end();
        let body = body.strip_suffix(';').unwrap_or(body).trim_end();
        write!(self.sink, "\n\n{body};")?;
        self.written += 1;
        Ok(())
    }

    /// Writes a batch of statements in order.
    pub fn statements<I, S>(&mut self, statements: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for sql in statements {
            self.statement(sql.as_ref())?;
        }
        Ok(())
    }

    /// Number of statements written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
