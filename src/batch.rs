// 📦 Batch Processor - best-effort, line-by-line roster import
//
// Reading → Done. Every line is classified and built in file order; a bad
// line is logged and skipped, never fatal. An unreadable source is fatal
// and yields an empty batch. The batch is handed to the repository once.

use crate::builders::BuildContext;
use crate::classifier::LineClassifier;
use crate::employee::{Employee, Manager};
use crate::error::SourceError;
use crate::resolver::ManagerResolver;
use crate::store::{EmployeeRepository, ManagerDirectory};
use crate::validators::GradeBounds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

// ============================================================================
// BATCH
// ============================================================================

/// Employees accepted so far in one run, in file order. Append-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    records: Vec<Employee>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, employee: Employee) {
        self.records.push(employee);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Employee] {
        &self.records
    }

    pub fn managers(&self) -> impl Iterator<Item = &Manager> {
        self.records.iter().filter_map(Employee::as_manager)
    }

    /// First manager accepted with this identifier
    pub fn find_manager(&self, identifier: &str) -> Option<&Manager> {
        self.managers().find(|m| m.identifier() == identifier)
    }

    pub fn into_vec(self) -> Vec<Employee> {
        self.records
    }
}

// ============================================================================
// RUN RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedLine {
    /// 1-based
    pub line_number: usize,
    pub code: String,
    pub message: String,
    pub raw_line: String,
}

/// In-memory outcome of one pass over the lines
#[derive(Debug, Clone, Default)]
pub struct BatchRun {
    pub batch: Batch,
    pub rejected: Vec<RejectedLine>,
    pub lines_read: usize,
}

/// What a full run did, after persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub source: String,
    /// SHA-256 of the source content, empty if it could not be read
    pub source_digest: String,
    pub lines_read: usize,
    pub accepted: usize,
    pub persisted: usize,
    pub rejected: Vec<RejectedLine>,
    pub source_error: Option<String>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        match &self.source_error {
            Some(err) => format!("{}: nothing imported ({})", self.source, err),
            None => format!(
                "{}: {} lines read | {} accepted, {} rejected, {} persisted",
                self.source,
                self.lines_read,
                self.accepted,
                self.rejected.len(),
                self.persisted
            ),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.source_error.is_none() && self.rejected.is_empty()
    }
}

// ============================================================================
// SOURCE
// ============================================================================

/// Read the whole source eagerly
pub fn read_source(path: &Path) -> std::result::Result<String, SourceError> {
    fs::read_to_string(path).map_err(|e| SourceError::SourceUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn source_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// PROCESSOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    grade_bounds: GradeBounds,
}

impl BatchProcessor {
    pub fn new(grade_bounds: GradeBounds) -> Self {
        BatchProcessor { grade_bounds }
    }

    /// One pass over the lines, strictly in order. Never fails as a whole.
    pub fn process_lines<'l, I>(&self, lines: I, directory: &dyn ManagerDirectory) -> BatchRun
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut run = BatchRun::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            run.lines_read += 1;

            let outcome = {
                let ctx = BuildContext {
                    resolver: ManagerResolver::new(&run.batch, directory),
                    grade_bounds: self.grade_bounds,
                };
                LineClassifier::process_line(line, &ctx)
            };

            match outcome {
                Ok(employee) => {
                    debug!(line = line_number, id = employee.identifier(), "accepted {}", employee.kind().as_str());
                    run.batch.push(employee);
                }
                Err(err) => {
                    error!("Line {} : {} => {}", line_number, err, line);
                    run.rejected.push(RejectedLine {
                        line_number,
                        code: err.code().to_string(),
                        message: err.to_string(),
                        raw_line: line.to_string(),
                    });
                }
            }
        }

        run
    }

    /// Read, validate, and hand the batch to the repository exactly once.
    ///
    /// An unreadable source still reaches the repository, as an empty batch.
    /// Only a repository failure makes this return Err.
    pub fn run<S>(&self, path: &Path, store: &mut S) -> Result<ImportReport>
    where
        S: ManagerDirectory + EmployeeRepository,
    {
        info!("Reading file: {}", path.display());

        let (run, digest, source_error) = match read_source(path) {
            Ok(content) => {
                let run = self.process_lines(content.lines(), &*store);
                info!("{} lines read", run.lines_read);
                (run, source_digest(&content), None)
            }
            Err(err) => {
                error!("{}", err);
                (BatchRun::default(), String::new(), Some(err.to_string()))
            }
        };

        let accepted = run.batch.len();
        let persisted = store
            .save_all(run.batch.as_slice())
            .context("Failed to persist employee batch")?;

        info!(
            "{} accepted, {} rejected, {} persisted",
            accepted,
            run.rejected.len(),
            persisted
        );

        Ok(ImportReport {
            source: path.display().to_string(),
            source_digest: digest,
            lines_read: run.lines_read,
            accepted,
            persisted,
            rejected: run.rejected,
            source_error,
        })
    }
}

// ============================================================================
// REJECTION EXPORT
// ============================================================================

pub const REJECTION_HEADER: [&str; 4] = ["line_number", "code", "message", "raw_line"];

/// Write rejected lines as CSV: line_number,code,message,raw_line
///
/// Replaces any previous file. The header is written even when nothing was rejected.
pub fn write_rejections(path: &Path, rejected: &[RejectedLine]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create rejection report: {}", path.display()))?;

    writer
        .write_record(REJECTION_HEADER)
        .context("Failed to write rejection header")?;

    for line in rejected {
        writer
            .serialize(line)
            .context("Failed to write rejected line")?;
    }

    writer.flush().context("Failed to flush rejection report")?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
