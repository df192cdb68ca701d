use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage a pack was in when something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackStage {
    Discovery,
    Extraction,
    Metadata,
    Compilation,
    Assembly,
    Ledger,
}

impl fmt::Display for PackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Discovery => "discovery",
            Self::Extraction => "extraction",
            Self::Metadata => "metadata",
            Self::Compilation => "compilation",
            Self::Assembly => "assembly",
            Self::Ledger => "ledger",
        };
        f.write_str(label)
    }
}

/// One compiler diagnostic: where it points and what it says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: Option<u32>,
    /// The offending source line, when the compiler echoed it.
    pub source_line: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message)?,
            None => f.write_str(&self.message)?,
        }
        if let Some(ref src) = self.source_line {
            write!(f, " | {}", src.trim())?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Failed to read datapack directory {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to extract bundle {bundle}: {reason}")]
    Extraction { bundle: PathBuf, reason: String },
    #[error("No pack.mcmeta found in {0}")]
    MissingDescriptor(PathBuf),
    #[error("Failed to parse pack.mcmeta at {path}: {reason}")]
    MetadataParse { path: PathBuf, reason: String },
    #[error("Java compiler unavailable: {0}")]
    CompilerUnavailable(String),
    #[error("Compilation of {class_name} failed with {} diagnostic(s)", diagnostics.len())]
    CompilationDiagnostic {
        class_name: String,
        diagnostics: Vec<Diagnostic>,
    },
    #[error("Failed to write archive {path}: {reason}")]
    ArchiveWrite { path: PathBuf, reason: String },
    #[error("Patch ledger I/O failed for {path}: {reason}")]
    LedgerIo { path: PathBuf, reason: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PackError {
    /// Fatal errors stop the whole run; everything else is scoped to one pack
    /// or degrades gracefully.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Discovery { .. } | Self::CompilerUnavailable(_) | Self::Config(_)
        )
    }

    pub fn stage(&self) -> PackStage {
        match self {
            Self::Discovery { .. } | Self::Config(_) => PackStage::Discovery,
            Self::Extraction { .. } => PackStage::Extraction,
            Self::MissingDescriptor(_) | Self::MetadataParse { .. } => PackStage::Metadata,
            Self::CompilerUnavailable(_) | Self::CompilationDiagnostic { .. } => {
                PackStage::Compilation
            }
            Self::ArchiveWrite { .. } => PackStage::Assembly,
            Self::LedgerIo { .. } => PackStage::Ledger,
        }
    }
}

pub type PackResult<T> = Result<T, PackError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
