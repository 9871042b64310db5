//! The command engine: parse, dispatch, commit.
//!
//! [`Engine::execute_command`] is the only way to change a workspace. Each
//! call parses the sentence, runs the matching handler against a read-only
//! view of the workspace, and commits the handler's staged changes only if it
//! succeeded. A failed command therefore leaves the workspace untouched.
//!
//! ```rust
//! use biospeak::engine::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! let result = engine.execute_command("load dna text ACGTACGT as s1");
//! assert!(result.is_ok());
//!
//! let result = engine.execute_command("count gc of s1");
//! assert!(result.message.contains("50.0%"));
//! ```

pub mod error;
mod handlers;
pub mod result;
pub mod script;
pub mod verify;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alignment::integration::IntegrationRegistry;
use crate::alignment::scoring::Scoring;
use crate::command::{Command, Grammar};
use crate::core::snapshot::WorkspaceSnapshot;
use crate::core::workspace::Workspace;
use crate::engine::error::CommandError;
use crate::engine::handlers::{Change, Context};
use crate::engine::result::ExecutionResult;

/// Engine settings shared by every front end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub scoring: Scoring,
    /// Try external multiple-sequence aligners before the built-in one
    pub external_aligners: bool,
}

pub struct Engine {
    workspace: Workspace,
    grammar: Grammar,
    integrations: IntegrationRegistry,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            workspace: Workspace::new(),
            grammar: Grammar::new(),
            integrations: IntegrationRegistry::new(config.external_aligners),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    #[must_use]
    pub fn integrations(&self) -> &IntegrationRegistry {
        &self.integrations
    }

    /// Register additional integrations ahead of the built-ins
    pub fn integrations_mut(&mut self) -> &mut IntegrationRegistry {
        &mut self.integrations
    }

    /// Parse and run one sentence. Never panics on user input and never
    /// changes the workspace unless the result status is `ok`.
    pub fn execute_command(&mut self, text: &str) -> ExecutionResult {
        let command = match self.grammar.parse(text) {
            Ok(command) => command,
            Err(e) => {
                let error = CommandError::from(e);
                debug!(error = %error, "Parse failed");
                return ExecutionResult::error(&error, self.snapshot());
            }
        };

        if command == Command::Exit {
            return ExecutionResult::exit(self.snapshot());
        }

        let context = Context {
            workspace: &self.workspace,
            config: &self.config,
            integrations: &self.integrations,
            grammar: &self.grammar,
        };

        match handlers::handle(&command, &context) {
            Ok(outcome) => {
                let created = self.commit(&command, text, outcome.changes);
                debug!(command = command.verb(), created = created.len(), "Command succeeded");
                ExecutionResult::ok(outcome.message, created, self.snapshot())
            }
            Err(e) => {
                debug!(command = command.verb(), error = %e, "Command failed");
                ExecutionResult::error(&e, self.snapshot())
            }
        }
    }

    /// Read-only projection of the current workspace
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        self.workspace.snapshot()
    }

    /// Drop every entity and the history
    pub fn reset_workspace(&mut self) -> WorkspaceSnapshot {
        self.workspace.clear();
        self.snapshot()
    }

    /// Apply staged changes; returns the names inserted, in order
    fn commit(&mut self, command: &Command, text: &str, changes: Vec<Change>) -> Vec<String> {
        let mut created = Vec::new();
        let mut record = command.is_mutating() && !changes.is_empty();

        for change in changes {
            match change {
                Change::Insert(entity) => {
                    created.push(entity.name().to_string());
                    self.workspace.insert(entity);
                }
                Change::Replace(workspace) => self.workspace = workspace,
                Change::Clear => {
                    self.workspace.clear();
                    record = false;
                }
            }
        }

        if record {
            self.workspace
                .record_activity(text.split_whitespace().collect::<Vec<_>>().join(" "));
        }
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::result::Status;

    #[test]
    fn test_syntax_error_leaves_workspace() {
        let mut engine = Engine::default();
        engine.execute_command("load dna text ACGT as s1");
        let before = engine.snapshot();

        let result = engine.execute_command("do a thing");
        assert_eq!(result.status, Status::Error);
        assert!(result.message.contains("Unrecognized command"));
        assert_eq!(result.workspace, before);
    }

    #[test]
    fn test_exit_verbs() {
        let mut engine = Engine::default();
        for verb in ["exit", "quit", "close", "leave"] {
            let result = engine.execute_command(verb);
            assert_eq!(result.status, Status::Exit);
        }
        assert!(engine.snapshot().is_empty());
    }

    #[test]
    fn test_history_records_mutations_only() {
        let mut engine = Engine::default();
        engine.execute_command("load  dna text ACGT   as s1");
        engine.execute_command("count gc of s1");
        engine.execute_command("reverse s1 as r");
        engine.execute_command("slice s1 from 3 to 2 as bad");

        assert_eq!(
            engine.snapshot().history,
            vec!["load dna text ACGT as s1", "reverse s1 as r"]
        );
    }

    #[test]
    fn test_reset_clears_history() {
        let mut engine = Engine::default();
        engine.execute_command("load dna text ACGT as s1");
        let result = engine.execute_command("reset workspace");
        assert!(result.is_ok());
        assert!(result.workspace.is_empty());
        assert!(result.workspace.history.is_empty());

        engine.execute_command("load dna text ACGT as s1");
        assert!(!engine.reset_workspace().sequences.iter().any(|s| s.name == "s1"));
    }

    #[test]
    fn test_created_names() {
        let mut engine = Engine::default();
        engine.execute_command("load dna text ACGTACGTAC as s1");
        let result = engine.execute_command("split s1 every 4 as part");
        assert_eq!(result.created, vec!["part_1", "part_2", "part_3"]);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut engine = Engine::default();
        engine.execute_command("load dna text ACGT as s1");
        assert_eq!(engine.snapshot(), engine.snapshot());
    }
}
