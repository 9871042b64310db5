//! Registry of optional integrations with always-available fallbacks.
//!
//! Each integration reports whether it can run on this machine. The registry
//! tries them in order and always ends with a built-in implementation, so a
//! missing or failing external tool never fails a command.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use noodles::fasta;
use thiserror::Error;
use tracing::{debug, warn};

use crate::alignment::group::{progressive_align, sum_of_pairs, GroupAlignment};
use crate::alignment::scoring::Scoring;
use crate::core::sequence::SequenceRecord;
use crate::core::types::Alphabet;
use crate::ops::composition::gc_percent;
use crate::ops::{require_nucleotide, OpError};

const DEFAULT_MAFFT_BIN: &str = "mafft";
const MAFFT_ENV_BIN: &str = "BIOSPEAK_MAFFT_BIN";

/// Number of points written by the trend plotter (plus the final position)
const TREND_POINTS: usize = 100;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("{0} is not available")]
    Unavailable(String),

    #[error("{tool} failed: {message}")]
    Failed { tool: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Multiple sequence alignment backend
pub trait GroupAligner {
    fn name(&self) -> &str;

    fn available(&self) -> bool;

    /// Rows must come back in member order
    fn align_group(
        &self,
        members: &[&SequenceRecord],
        scoring: &Scoring,
    ) -> Result<GroupAlignment, IntegrationError>;
}

/// Sequence metrics plot backend
pub trait SequencePlotter {
    fn name(&self) -> &str;

    fn available(&self) -> bool;

    fn plot(&self, record: &SequenceRecord, target: &Path) -> Result<(), IntegrationError>;
}

/// Built-in progressive Needleman–Wunsch aligner
pub struct ProgressiveAligner;

impl GroupAligner for ProgressiveAligner {
    fn name(&self) -> &str {
        "progressive needleman-wunsch"
    }

    fn available(&self) -> bool {
        true
    }

    fn align_group(
        &self,
        members: &[&SequenceRecord],
        scoring: &Scoring,
    ) -> Result<GroupAlignment, IntegrationError> {
        let alphabet = members.first().map_or(Alphabet::Dna, |m| m.alphabet);
        let sequences: Vec<&[u8]> = members.iter().map(|m| m.as_bytes()).collect();
        Ok(progressive_align(&sequences, alphabet, scoring))
    }
}

/// External MAFFT aligner, found on `PATH` or through `BIOSPEAK_MAFFT_BIN`
#[derive(Debug, Clone)]
pub struct MafftAligner {
    executable: String,
}

impl Default for MafftAligner {
    fn default() -> Self {
        let executable = std::env::var(MAFFT_ENV_BIN)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MAFFT_BIN.to_string());
        Self { executable }
    }
}

impl MafftAligner {
    fn resolve(&self) -> Option<PathBuf> {
        resolve_executable(&self.executable)
    }
}

impl GroupAligner for MafftAligner {
    fn name(&self) -> &str {
        "mafft"
    }

    fn available(&self) -> bool {
        self.resolve().is_some()
    }

    fn align_group(
        &self,
        members: &[&SequenceRecord],
        scoring: &Scoring,
    ) -> Result<GroupAlignment, IntegrationError> {
        let executable = self
            .resolve()
            .ok_or_else(|| IntegrationError::Unavailable(self.executable.clone()))?;
        let failed = |message: String| IntegrationError::Failed {
            tool: "mafft".to_string(),
            message,
        };

        // Members are written as seq0, seq1, … so names with spaces survive
        let mut input = tempfile::Builder::new().suffix(".fa").tempfile()?;
        {
            let mut writer = fasta::io::Writer::new(input.as_file_mut());
            for (i, member) in members.iter().enumerate() {
                let definition = fasta::record::Definition::new(format!("seq{i}"), None);
                let sequence = fasta::record::Sequence::from(member.as_bytes().to_vec());
                writer.write_record(&fasta::Record::new(definition, sequence))?;
            }
        }
        input.as_file_mut().flush()?;

        debug!(executable = %executable.display(), members = members.len(), "Running mafft");
        let output = Command::new(&executable)
            .args(["--quiet", "--auto"])
            .arg(input.path())
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    IntegrationError::Unavailable(self.executable.clone())
                } else {
                    failed(e.to_string())
                }
            })?;

        if !output.status.success() {
            return Err(failed(format!(
                "exit status {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut reader = fasta::io::Reader::new(BufReader::new(output.stdout.as_slice()));
        let mut rows = Vec::with_capacity(members.len());
        for result in reader.records() {
            let record = result.map_err(|e| failed(format!("unreadable output: {e}")))?;
            rows.push(String::from_utf8_lossy(record.sequence().as_ref()).to_uppercase());
        }

        if rows.len() != members.len() {
            return Err(failed(format!(
                "returned {} rows for {} members",
                rows.len(),
                members.len()
            )));
        }

        let alphabet = members[0].alphabet;
        let score = sum_of_pairs(&rows, alphabet, scoring);
        Ok(GroupAlignment { rows, score })
    }
}

/// Built-in plotter: writes a GC% trend table (`position`, `gc_percent`) as TSV
pub struct TrendTablePlotter;

impl SequencePlotter for TrendTablePlotter {
    fn name(&self) -> &str {
        "gc trend table"
    }

    fn available(&self) -> bool {
        true
    }

    fn plot(&self, record: &SequenceRecord, target: &Path) -> Result<(), IntegrationError> {
        let failed = |message: String| IntegrationError::Failed {
            tool: self.name().to_string(),
            message,
        };

        let points = gc_trend(record).map_err(|e| failed(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(File::create(target)?);
        writer
            .write_record(["position", "gc_percent"])
            .map_err(|e| failed(e.to_string()))?;

        for (position, gc) in points {
            writer
                .write_record([position.to_string(), format!("{gc:.2}")])
                .map_err(|e| failed(e.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Cumulative GC% of each prefix, sampled at up to `TREND_POINTS` positions
fn gc_trend(record: &SequenceRecord) -> Result<Vec<(usize, f64)>, OpError> {
    require_nucleotide(record.alphabet, "GC trend")?;
    let length = record.length();
    let step = (length / TREND_POINTS).max(1);

    let mut points = Vec::new();
    let mut position = step;
    while position <= length {
        let prefix = SequenceRecord::derived(
            record.name.clone(),
            record.alphabet,
            record.sequence[..position].to_string(),
            String::new(),
        );
        points.push((position, gc_percent(&prefix)?));
        if position == length {
            break;
        }
        position = (position + step).min(length);
    }
    Ok(points)
}

/// Availability of one integration, for `list integrations`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationStatus {
    pub kind: &'static str,
    pub name: String,
    pub available: bool,
}

/// Ordered integrations, built-ins last
pub struct IntegrationRegistry {
    aligners: Vec<Box<dyn GroupAligner>>,
    plotters: Vec<Box<dyn SequencePlotter>>,
}

impl Default for IntegrationRegistry {
    fn default() -> Self {
        Self::new(false)
    }
}

impl IntegrationRegistry {
    /// Built-ins only, plus external tools when `external_aligners` is set
    #[must_use]
    pub fn new(external_aligners: bool) -> Self {
        let mut aligners: Vec<Box<dyn GroupAligner>> = Vec::new();
        if external_aligners {
            aligners.push(Box::new(MafftAligner::default()));
        }
        aligners.push(Box::new(ProgressiveAligner));

        Self {
            aligners,
            plotters: vec![Box::new(TrendTablePlotter)],
        }
    }

    /// Insert an aligner ahead of the built-in fallback
    pub fn register_aligner(&mut self, aligner: Box<dyn GroupAligner>) {
        let at = self.aligners.len().saturating_sub(1);
        self.aligners.insert(at, aligner);
    }

    /// Insert a plotter ahead of the built-in fallback
    pub fn register_plotter(&mut self, plotter: Box<dyn SequencePlotter>) {
        let at = self.plotters.len().saturating_sub(1);
        self.plotters.insert(at, plotter);
    }

    #[must_use]
    pub fn status(&self) -> Vec<IntegrationStatus> {
        let aligners = self.aligners.iter().map(|a| IntegrationStatus {
            kind: "aligner",
            name: a.name().to_string(),
            available: a.available(),
        });
        let plotters = self.plotters.iter().map(|p| IntegrationStatus {
            kind: "plotter",
            name: p.name().to_string(),
            available: p.available(),
        });
        aligners.chain(plotters).collect()
    }

    /// Align with the first available aligner, falling through on failure.
    ///
    /// Returns the alignment and the name of the aligner that produced it.
    ///
    /// # Errors
    ///
    /// Returns the last error if every aligner fails.
    pub fn align_group(
        &self,
        members: &[&SequenceRecord],
        scoring: &Scoring,
    ) -> Result<(GroupAlignment, String), IntegrationError> {
        let mut last_error = IntegrationError::Unavailable("group aligner".to_string());
        for aligner in self.aligners.iter().filter(|a| a.available()) {
            match aligner.align_group(members, scoring) {
                Ok(alignment) => return Ok((alignment, aligner.name().to_string())),
                Err(e) => {
                    warn!(aligner = aligner.name(), error = %e, "Aligner failed, trying next");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    /// Plot with the first available plotter, falling through on failure
    ///
    /// # Errors
    ///
    /// Returns the last error if every plotter fails.
    pub fn plot(&self, record: &SequenceRecord, target: &Path) -> Result<String, IntegrationError> {
        let mut last_error = IntegrationError::Unavailable("sequence plotter".to_string());
        for plotter in self.plotters.iter().filter(|p| p.available()) {
            match plotter.plot(record, target) {
                Ok(()) => return Ok(plotter.name().to_string()),
                Err(e) => {
                    warn!(plotter = plotter.name(), error = %e, "Plotter failed, trying next");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

fn resolve_executable(program: &str) -> Option<PathBuf> {
    let trimmed = program.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(std::path::MAIN_SEPARATOR) {
        let candidate = PathBuf::from(trimmed);
        return candidate.is_file().then_some(candidate);
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(trimmed))
        .find(|candidate| candidate.is_file())
}
