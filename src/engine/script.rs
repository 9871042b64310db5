//! Batch execution of command scripts.
//!
//! Each executable line is its own transaction against the shared workspace.
//! A failing line is recorded and the run continues; an exit verb stops it.
//! Lines keep only what the engine answered; the workspace is captured once,
//! after the last line.

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::snapshot::WorkspaceSnapshot;
use crate::engine::error::ErrorKind;
use crate::engine::result::{ExecutionResult, Status};
use crate::engine::Engine;

/// One executed line and what the engine answered
#[derive(Debug, Clone, Serialize)]
pub struct ScriptLine {
    /// 1-based line number in the script text
    pub line_number: usize,
    pub text: String,
    pub status: Status,
    pub message: String,
    pub created: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl ScriptLine {
    fn new(line_number: usize, text: String, result: ExecutionResult) -> Self {
        Self {
            line_number,
            text,
            status: result.status,
            message: result.message,
            created: result.created,
            error_kind: result.error_kind,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    #[must_use]
    pub fn is_exit(&self) -> bool {
        self.status == Status::Exit
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptOutcome {
    pub lines: Vec<ScriptLine>,
    /// An exit verb stopped the script before its end
    pub exited: bool,
    /// Workspace after the last executed line
    pub workspace: WorkspaceSnapshot,
}

impl ScriptOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &ScriptLine> {
        self.lines.iter().filter(|line| !line.is_ok() && !line.is_exit())
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Blank lines, `#` comments and `note ...` lines are skipped
#[must_use]
pub fn is_executable(line: &str) -> bool {
    let trimmed = line.trim();
    !(trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.to_lowercase().starts_with("note "))
}

/// Run every executable line of `script` in order
pub fn run_script(engine: &mut Engine, script: &str) -> ScriptOutcome {
    run_script_with(engine, script, |_| {})
}

/// Run `script`, handing each line to `on_line` as soon as it has executed
pub fn run_script_with<F>(engine: &mut Engine, script: &str, mut on_line: F) -> ScriptOutcome
where
    F: FnMut(&ScriptLine),
{
    let mut outcome = ScriptOutcome::default();

    for (index, line) in script.lines().enumerate() {
        if !is_executable(line) {
            continue;
        }
        let text = line.trim().to_string();
        let line = ScriptLine::new(index + 1, text.clone(), engine.execute_command(&text));
        on_line(&line);

        let exited = line.is_exit();
        if exited {
            debug!(line = line.line_number, "Script exited");
        } else if !line.is_ok() {
            warn!(line = line.line_number, error = %line.message, "Script line failed");
        }
        outcome.lines.push(line);
        if exited {
            outcome.exited = true;
            break;
        }
    }

    outcome.workspace = engine.snapshot();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_executable() {
        assert!(is_executable("count gc of s1"));
        assert!(is_executable("  help  "));
        assert!(!is_executable(""));
        assert!(!is_executable("   "));
        assert!(!is_executable("# comment"));
        assert!(!is_executable("Note this is prose"));
        assert!(is_executable("notes"));
    }

    #[test]
    fn test_errors_do_not_stop_the_script() {
        let mut engine = Engine::default();
        let script = "\
# setup
load dna text ACGTACGT as s1
count gc of missing
note the next line still runs
reverse s1 as r
";
        let outcome = run_script(&mut engine, script);
        assert_eq!(outcome.lines.len(), 3);
        assert!(!outcome.succeeded());

        let failures: Vec<_> = outcome.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].line_number, 3);
        assert!(engine.snapshot().sequence("r").is_some());
    }

    #[test]
    fn test_exit_stops_the_script() {
        let mut engine = Engine::default();
        let outcome = run_script(&mut engine, "load dna text ACGT as s1\nquit\nreverse s1 as r\n");
        assert!(outcome.exited);
        assert!(outcome.succeeded());
        assert_eq!(outcome.lines.len(), 2);
        assert!(engine.snapshot().sequence("r").is_none());
    }

    #[test]
    fn test_lines_stream_and_workspace_is_captured_once() {
        let mut engine = Engine::default();
        let script = "load dna text ACGTACGT as s1\ncount gc of s1\ncount gc of nope\nreverse s1 as r\n";

        let mut seen = Vec::new();
        let outcome = run_script_with(&mut engine, script, |line| {
            seen.push((line.line_number, line.status));
        });
        assert_eq!(
            seen,
            vec![(1, Status::Ok), (2, Status::Ok), (3, Status::Error), (4, Status::Ok)]
        );

        assert_eq!(outcome.lines[0].created, vec!["s1".to_string()]);
        assert_eq!(outcome.lines[1].message, "GC of s1 is 50.0%.");
        assert_eq!(outcome.lines[2].error_kind, Some(ErrorKind::Semantic));
        assert_eq!(outcome.workspace, engine.snapshot());
        assert!(outcome.workspace.sequence("r").is_some());

        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json["lines"][1].get("workspace").is_none());
        assert_eq!(json["workspace"]["sequences"].as_array().unwrap().len(), 2);
    }
}
