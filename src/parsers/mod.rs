pub mod cache;
pub mod common;
pub mod python;
pub mod references;

use serde::{Deserialize, Serialize};

use crate::core::{AnalysisError, CallSite, FileEntity, Result};

/// Call sites found in the body of one function or method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityCalls {
    pub caller_id: String,
    pub call_sites: Vec<CallSite>,
}

/// Result of pass 1 for one file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedFile {
    pub file: FileEntity,
    pub calls: Vec<EntityCalls>,
}

pub trait LanguageParser {
    fn parse_source(&self, file_id: &str, source: &str) -> Result<ParsedFile>;
    fn language_name(&self) -> &str;
}

pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn get_parser(&self, language: &str) -> Result<Box<dyn LanguageParser + Send + Sync>> {
        match language {
            "python" | "py" => Ok(Box::new(python::PythonParser::new()?)),
            _ => Err(AnalysisError::TreeSitter(format!(
                "Unsupported language: {}",
                language
            ))),
        }
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
