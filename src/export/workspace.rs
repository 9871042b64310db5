use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::snapshot::WorkspaceSnapshot;
use crate::core::workspace::Workspace;
use crate::export::{ensure_parent, ExportError};

/// Document version for compatibility checking
pub const WORKSPACE_VERSION: &str = "1.0.0";

/// Serializable workspace export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceDocument {
    pub generated_at: String,
    pub version: String,
    #[serde(flatten)]
    pub workspace: WorkspaceSnapshot,
}

impl WorkspaceDocument {
    #[must_use]
    pub fn new(workspace: WorkspaceSnapshot) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            version: WORKSPACE_VERSION.to_string(),
            workspace,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document; a version mismatch is only a warning
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let document: Self = serde_json::from_str(json)?;
        if document.version != WORKSPACE_VERSION {
            warn!(
                expected = WORKSPACE_VERSION,
                found = %document.version,
                "Workspace document version mismatch"
            );
        }
        Ok(document)
    }
}

pub fn write_workspace(path: &Path, workspace: &Workspace) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let json = WorkspaceDocument::new(workspace.snapshot()).to_json()?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read and validate a workspace document. Nothing is returned unless every
/// entity passes the workspace invariants.
pub fn read_workspace(path: &Path) -> Result<Workspace, ExportError> {
    let content = std::fs::read_to_string(path)?;
    let document = WorkspaceDocument::from_json(&content)?;
    let workspace = Workspace::from_snapshot(document.workspace)
        .map_err(|e| ExportError::Invalid(e.to_string()))?;

    let problems = workspace.check_invariants();
    if !problems.is_empty() {
        return Err(ExportError::Invalid(problems.join("; ")));
    }
    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::Report;
    use crate::core::sequence::SequenceRecord;
    use crate::core::types::Alphabet;
    use crate::core::workspace::Entity;

    fn workspace() -> Workspace {
        let mut ws = Workspace::new();
        ws.insert(Entity::Sequence(
            SequenceRecord::new("s1", Alphabet::Dna, "ACGTACGT").unwrap(),
        ));
        ws.insert(Entity::Report(Report::new("r", vec!["line".to_string()])));
        ws.record_activity("load dna text ACGTACGT as s1");
        ws
    }

    #[test]
    fn test_document_fields() {
        let json = WorkspaceDocument::new(workspace().snapshot()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in ["generated_at", "version", "sequences", "alignments", "tables", "reports", "history"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["sequences"][0]["length"], 8);
        assert!(chrono::DateTime::parse_from_rfc3339(value["generated_at"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_write_then_read_restores_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session/ws.json");
        let original = workspace();

        write_workspace(&path, &original).unwrap();
        assert_eq!(read_workspace(&path).unwrap(), original);
    }

    #[test]
    fn test_read_rejects_corrupt_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"generated_at":"x","version":"1.0.0","sequences":[{"name":"s","alphabet":"dna","sequence":"AC!T","length":4}],"alignments":[],"tables":[],"reports":[]}"#,
        )
        .unwrap();

        assert!(matches!(read_workspace(&path), Err(ExportError::Invalid(_))));
    }

    #[test]
    fn test_read_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(read_workspace(&path), Err(ExportError::Json(_))));
    }
}
