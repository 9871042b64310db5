use serde::Serialize;

use crate::core::snapshot::WorkspaceSnapshot;
use crate::engine::error::{CommandError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
    Exit,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error => write!(f, "error"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// What every front end gets back from one command
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub status: Status,
    pub message: String,
    /// Names registered by this command, in creation order
    pub created: Vec<String>,
    /// Failure family when `status` is `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub workspace: WorkspaceSnapshot,
}

impl ExecutionResult {
    pub(crate) fn ok(message: String, created: Vec<String>, workspace: WorkspaceSnapshot) -> Self {
        Self {
            status: Status::Ok,
            message,
            created,
            error_kind: None,
            workspace,
        }
    }

    pub(crate) fn exit(workspace: WorkspaceSnapshot) -> Self {
        Self {
            status: Status::Exit,
            message: "Goodbye.".to_string(),
            created: Vec::new(),
            error_kind: None,
            workspace,
        }
    }

    pub(crate) fn error(error: &CommandError, workspace: WorkspaceSnapshot) -> Self {
        Self {
            status: Status::Error,
            message: error.to_string(),
            created: Vec::new(),
            error_kind: Some(error.kind()),
            workspace,
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
