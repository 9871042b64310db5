//! Self-verification: grammar, integrations, a canned demo run and
//! workspace invariants, summarized as one report.
//!
//! Every check contributes one `PASS` or `FAIL` line. The report is stored
//! as [`VERIFICATION_REPORT`] and the CLI exits non-zero when any line fails.

use tracing::info;

use crate::command::Grammar;
use crate::core::report::Report;
use crate::core::workspace::Workspace;
use crate::engine::script::run_script;
use crate::engine::{Engine, EngineConfig};

/// Demo session exercised end to end by every verification run
pub const DEMO_SCRIPT: &str = include_str!("../../scripts/demo.bio");

pub const VERIFICATION_REPORT: &str = "verification_report";

const PASS: &str = "PASS";
const FAIL: &str = "FAIL";

struct Checks {
    lines: Vec<String>,
    failed: usize,
    total: usize,
}

impl Checks {
    fn new() -> Self {
        Self {
            lines: vec!["Verification report".to_string()],
            failed: 0,
            total: 0,
        }
    }

    fn pass(&mut self, message: String) {
        self.total += 1;
        self.lines.push(format!("{PASS} {message}"));
    }

    fn fail(&mut self, message: String) {
        self.total += 1;
        self.failed += 1;
        self.lines.push(format!("{FAIL} {message}"));
    }

    /// One check that fails with every problem listed
    fn expect_none(&mut self, what: &str, problems: &[String]) {
        if problems.is_empty() {
            self.pass(what.to_string());
        } else {
            for problem in problems {
                self.fail(format!("{what}: {problem}"));
            }
        }
    }

    fn finish(mut self) -> Report {
        let summary = if self.failed == 0 {
            format!("Verification passed ({} checks).", self.total)
        } else {
            format!(
                "Verification FAILED ({} of {} checks).",
                self.failed, self.total
            )
        };
        self.lines.push(summary);
        Report::new(VERIFICATION_REPORT, self.lines).with_description("self-verification")
    }
}

/// Verify the engine modules and `workspace`.
///
/// The demo script runs on a fresh engine with external aligners disabled,
/// so the result never depends on locally installed tools.
#[must_use]
pub fn run(workspace: &Workspace, grammar: &Grammar) -> Report {
    let mut checks = Checks::new();

    let template_count = grammar.templates().count();
    let mismatches = grammar.check_examples();
    checks.expect_none(
        &format!("grammar: {template_count} templates parse their own examples"),
        &mismatches,
    );

    let mut demo = Engine::new(EngineConfig {
        external_aligners: false,
        ..EngineConfig::default()
    });

    let statuses = demo.integrations().status();
    for kind in ["aligner", "plotter"] {
        if statuses.iter().any(|s| s.kind == kind && s.available) {
            checks.pass(format!("integrations: {kind} available"));
        } else {
            checks.fail(format!("integrations: no {kind} available"));
        }
    }

    let outcome = run_script(&mut demo, DEMO_SCRIPT);
    let failures: Vec<String> = outcome
        .failures()
        .map(|line| format!("line {} '{}': {}", line.line_number, line.text, line.message))
        .collect();
    checks.expect_none(
        &format!("demo script: {} commands", outcome.lines.len()),
        &failures,
    );

    checks.expect_none(
        "demo workspace invariants",
        &demo.workspace().check_invariants(),
    );

    let first = demo.snapshot();
    if first == demo.snapshot() {
        checks.pass("snapshot is idempotent".to_string());
    } else {
        checks.fail("snapshot changed between two reads".to_string());
    }

    match Workspace::from_snapshot(first) {
        Ok(restored) if &restored == demo.workspace() => {
            checks.pass("snapshot restores the demo workspace".to_string());
        }
        Ok(_) => checks.fail("snapshot restores a different workspace".to_string()),
        Err(e) => checks.fail(format!("snapshot does not restore: {e}")),
    }

    checks.expect_none("current workspace invariants", &workspace.check_invariants());

    let report = checks.finish();
    info!(lines = report.lines.len(), passed = passed(&report), "Verification finished");
    report
}

/// No line of `report` starts with `FAIL`
#[must_use]
pub fn passed(report: &Report) -> bool {
    !report.lines.iter().any(|line| line.starts_with(FAIL))
}
