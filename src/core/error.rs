use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The syntax tree for a file contains errors
    #[error("Failed to parse {file} at line {line}: {message}")]
    Parse {
        file: String,
        message: String,
        line: usize,
    },

    /// File content could not be obtained
    #[error("Failed to read {file}: {message}")]
    Read { file: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl AnalysisError {
    pub fn parse(file: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
            line,
        }
    }

    pub fn read(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Convert a per-file failure into a diagnostic record.
    ///
    /// Infrastructure errors that are not tied to a file yield `None`.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            AnalysisError::Parse {
                file,
                message,
                line,
            } => Some(Diagnostic {
                file: file.clone(),
                kind: DiagnosticKind::ParseFailure,
                message: message.clone(),
                line: Some(*line),
            }),
            AnalysisError::Read { file, message } => Some(Diagnostic {
                file: file.clone(),
                kind: DiagnosticKind::ReadFailure,
                message: message.clone(),
                line: None,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    ParseFailure,
    ReadFailure,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::ParseFailure => "parse-failure",
            DiagnosticKind::ReadFailure => "read-failure",
        }
    }
}

/// A file that was skipped during a run, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: Option<usize>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "{} [{}] line {}: {}",
                self.file,
                self.kind.as_str(),
                line,
                self.message
            ),
            None => write!(f, "{} [{}]: {}", self.file, self.kind.as_str(), self.message),
        }
    }
}
