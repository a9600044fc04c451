//! DIMACS CNF serialization

use super::constraints::{Clause, ClauseCounts};
use crate::error::FormulaError;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Streams clauses in DIMACS CNF form.
///
/// The `p cnf` header is written up front from counts computed before
/// compilation, so clauses never have to be held in memory. [`finish`]
/// rejects a body whose length disagrees with the header.
///
/// [`finish`]: FormulaWriter::finish
pub struct FormulaWriter<W: Write> {
    inner: W,
    expected_clauses: usize,
    written_clauses: usize,
}

impl<W: Write> FormulaWriter<W> {
    /// Write the header line and return a writer ready for clauses
    pub fn new(mut inner: W, variables: usize, clauses: usize) -> Result<Self, FormulaError> {
        writeln!(inner, "p cnf {} {}", variables, clauses)?;
        Ok(Self {
            inner,
            expected_clauses: clauses,
            written_clauses: 0,
        })
    }

    /// Append one clause line
    pub fn write_clause(&mut self, clause: &Clause) -> Result<(), FormulaError> {
        writeln!(self.inner, "{}", clause)?;
        self.written_clauses += 1;
        Ok(())
    }

    /// Append every clause of an iterator
    pub fn write_all<I>(&mut self, clauses: I) -> Result<(), FormulaError>
    where
        I: IntoIterator<Item = Clause>,
    {
        for clause in clauses {
            self.write_clause(&clause)?;
        }
        Ok(())
    }

    pub fn written_clauses(&self) -> usize {
        self.written_clauses
    }

    /// Check the clause count against the header and flush
    pub fn finish(mut self) -> Result<W, FormulaError> {
        if self.written_clauses != self.expected_clauses {
            return Err(FormulaError::ClauseCountMismatch {
                expected: self.expected_clauses,
                written: self.written_clauses,
            });
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write a full formula to any writer
pub fn write_formula<W, I>(writer: W, counts: &ClauseCounts, clauses: I) -> Result<W, FormulaError>
where
    W: Write,
    I: IntoIterator<Item = Clause>,
{
    let mut formula = FormulaWriter::new(writer, counts.variables, counts.total())?;
    formula.write_all(clauses)?;
    formula.finish()
}

/// Write a full formula to `path`.
///
/// The body goes to a temporary file next to `path` that only replaces it
/// once complete, so a failed write never leaves a truncated formula behind.
pub fn write_formula_to_file<I>(path: &Path, counts: &ClauseCounts, clauses: I) -> Result<(), FormulaError>
where
    I: IntoIterator<Item = Clause>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let temp = tempfile::NamedTempFile::new_in(dir)?;
    let buffered = write_formula(BufWriter::new(temp), counts, clauses)?;
    let temp = buffered.into_inner().map_err(|e| e.into_error())?;
    temp.persist(path).map_err(|e| e.error)?;

    tracing::info!(
        path = %path.display(),
        variables = counts.variables,
        clauses = counts.total(),
        "wrote DIMACS formula"
    );
    Ok(())
}
