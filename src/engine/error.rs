use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::alignment::integration::IntegrationError;
use crate::command::SyntaxError;
use crate::core::snapshot::SnapshotError;
use crate::core::table::TableError;
use crate::export::ExportError;
use crate::ops::OpError;
use crate::parsing::ParseError;

/// The three failure families a command can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Text matched no template
    Syntax,
    /// Well-formed command that cannot apply to the workspace
    Semantic,
    /// File access or malformed input data
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Semantic => write!(f, "semantic"),
            Self::Io => write!(f, "io"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}. Type 'help' to list commands.")]
    Syntax(#[from] SyntaxError),

    #[error("No {category} named '{name}'")]
    MissingName { category: &'static str, name: String },

    #[error("'{name}' is ambiguous: it names a {categories}")]
    AmbiguousName { name: String, categories: String },

    #[error("{0}")]
    WrongAlphabet(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("'{value}' is not a valid {what}")]
    InvalidNumber { what: &'static str, value: String },

    #[error("{0}")]
    UnsupportedMode(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Format error: {0}")]
    Format(ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Integration error: {0}")]
    Integration(String),
}

impl CommandError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::MissingName { .. }
            | Self::AmbiguousName { .. }
            | Self::WrongAlphabet(_)
            | Self::InvalidRange(_)
            | Self::InvalidNumber { .. }
            | Self::UnsupportedMode(_)
            | Self::InvalidArgument(_) => ErrorKind::Semantic,
            Self::Format(_) | Self::Io(_) | Self::Integration(_) => ErrorKind::Io,
        }
    }
}

impl From<OpError> for CommandError {
    fn from(e: OpError) -> Self {
        match e {
            OpError::InvalidRange(message) => Self::InvalidRange(message),
            OpError::WrongAlphabet { .. } | OpError::AlphabetMismatch { .. } => {
                Self::WrongAlphabet(e.to_string())
            }
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl From<IntegrationError> for CommandError {
    fn from(e: IntegrationError) -> Self {
        match e {
            IntegrationError::Io(io) => Self::Io(io),
            other => Self::Integration(other.to_string()),
        }
    }
}

impl From<ParseError> for CommandError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Io(io) => Self::Io(io),
            other => Self::Format(other),
        }
    }
}

impl From<ExportError> for CommandError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Io(io) => Self::Io(io),
            ExportError::Csv(e) => Self::Format(ParseError::Csv(e.to_string())),
            ExportError::Json(e) => Self::Format(ParseError::Json(e.to_string())),
            ExportError::Invalid(message) => Self::Format(ParseError::InvalidFormat(message)),
        }
    }
}

impl From<TableError> for CommandError {
    fn from(e: TableError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

impl From<SnapshotError> for CommandError {
    fn from(e: SnapshotError) -> Self {
        Self::Format(ParseError::InvalidFormat(e.to_string()))
    }
}
