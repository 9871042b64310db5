//! Registered integrations driven through the engine
//!
//! Stub backends stand in for external tools so the delegation path of
//! `align group` and `plot sequences` runs without anything installed.

use std::path::Path;

use biospeak::alignment::group::GroupAlignment;
use biospeak::alignment::integration::{GroupAligner, IntegrationError, SequencePlotter};
use biospeak::alignment::scoring::Scoring;
use biospeak::core::sequence::SequenceRecord;
use biospeak::{Engine, Status};
use tempfile::TempDir;

/// Pads every member with one trailing gap and reports a fixed score
struct PaddingAligner;

impl GroupAligner for PaddingAligner {
    fn name(&self) -> &str {
        "padding aligner"
    }

    fn available(&self) -> bool {
        true
    }

    fn align_group(
        &self,
        members: &[&SequenceRecord],
        _scoring: &Scoring,
    ) -> Result<GroupAlignment, IntegrationError> {
        Ok(GroupAlignment {
            rows: members.iter().map(|m| format!("{}-", m.sequence)).collect(),
            score: 42,
        })
    }
}

struct Offline;

impl SequencePlotter for Offline {
    fn name(&self) -> &str {
        "offline plotter"
    }

    fn available(&self) -> bool {
        false
    }

    fn plot(&self, _record: &SequenceRecord, _target: &Path) -> Result<(), IntegrationError> {
        Err(IntegrationError::Unavailable("offline plotter".to_string()))
    }
}

/// Writes the sequence name and length instead of a chart
struct SummaryPlotter;

impl SequencePlotter for SummaryPlotter {
    fn name(&self) -> &str {
        "summary plotter"
    }

    fn available(&self) -> bool {
        true
    }

    fn plot(&self, record: &SequenceRecord, target: &Path) -> Result<(), IntegrationError> {
        std::fs::write(target, format!("{}\t{}\n", record.name, record.length()))?;
        Ok(())
    }
}

fn engine() -> Engine {
    let mut engine = Engine::default();
    for line in [
        "load dna text ACGTACGT as a",
        "load dna text ACGTTCGT as b",
        "load dna text ACGACGT as c",
    ] {
        assert_eq!(engine.execute_command(line).status, Status::Ok, "{line}");
    }
    engine
}

#[test]
fn test_registered_aligner_is_used_for_groups() {
    let mut engine = engine();
    engine
        .integrations_mut()
        .register_aligner(Box::new(PaddingAligner));

    let result = engine.execute_command("align group a b c as g");
    assert_eq!(result.status, Status::Ok, "{}", result.message);
    assert!(result.message.contains("using padding aligner"), "{}", result.message);

    let g = result.workspace.alignment("g").unwrap();
    assert_eq!(g.method, "padding aligner");
    assert_eq!(g.score, 42);
    assert_eq!(g.members, vec!["a", "b", "c"]);
    assert_eq!(g.lines, vec!["a: ACGTACGT-", "b: ACGTTCGT-", "c: ACGACGT-"]);
}

#[test]
fn test_registered_plotter_runs_before_builtin() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine();
    engine.integrations_mut().register_plotter(Box::new(Offline));
    engine
        .integrations_mut()
        .register_plotter(Box::new(SummaryPlotter));

    let listing = engine.execute_command("list integrations");
    assert!(listing.message.contains("  plotter: offline plotter (not available)"));
    assert!(listing.message.contains("  plotter: summary plotter (available)"));

    let path = dir.path().join("a.tsv");
    let result = engine.execute_command(&format!("plot sequences a to file {}", path.display()));
    assert_eq!(result.status, Status::Ok, "{}", result.message);
    assert_eq!(
        result.message,
        format!("Saved sequence plots to {} (summary plotter).", path.display())
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\t8\n");
}
