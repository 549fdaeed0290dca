//! Module containing the definition of error types.

use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Stages of the inspection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Package archive extraction.
    Extraction,
    /// File type classification.
    FileStructure,
    /// Image extraction.
    Media,
    /// Manifest signal extraction.
    Manifest,
    /// Code signal scanning.
    Code,
    /// Resource inventory.
    Resources,
    /// Risk heuristics.
    Heuristics,
    /// Text report rendering.
    Report,
    /// Evidence bundle creation.
    Bundle,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extraction => "extraction",
            Self::FileStructure => "file structure",
            Self::Media => "media extraction",
            Self::Manifest => "manifest",
            Self::Code => "code scan",
            Self::Resources => "resources",
            Self::Heuristics => "heuristics",
            Self::Report => "report",
            Self::Bundle => "bundle",
        };
        f.write_str(name)
    }
}

/// Enumeration of the different error kinds.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The package archive is missing, unreadable or corrupt.
    #[error("the package archive could not be extracted: {message}")]
    Archive {
        /// Error message.
        message: String,
    },
    /// The text reports could not be rendered.
    #[error("the reports could not be rendered: {message}")]
    Report {
        /// Error message.
        message: String,
    },
    /// The evidence bundle could not be written.
    #[error("the evidence bundle could not be created: {message}")]
    Bundle {
        /// Error message.
        message: String,
    },
    /// The run was cancelled or timed out.
    #[error("the analysis was cancelled during the {stage} stage")]
    Cancelled {
        /// Stage that was running when the cancellation was noticed.
        stage: Stage,
    },
    /// Configuration error.
    #[error("there was an error in the configuration: {message}")]
    Config {
        /// Error message.
        message: String,
    },
}

impl ErrorKind {
    /// Creates an archive error from anything printable.
    pub fn archive<M: fmt::Display>(message: M) -> Self {
        Self::Archive {
            message: message.to_string(),
        }
    }

    /// Creates a bundle error from anything printable.
    pub fn bundle<M: fmt::Display>(message: M) -> Self {
        Self::Bundle {
            message: message.to_string(),
        }
    }

    /// Gets the pipeline stage that failed, if the error belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Archive { .. } => Some(Stage::Extraction),
            Self::Report { .. } => Some(Stage::Report),
            Self::Bundle { .. } => Some(Stage::Bundle),
            Self::Cancelled { stage } => Some(*stage),
            Self::Config { .. } => None,
        }
    }
}

/// A non-fatal problem with a single file.
///
/// Per-file failures never abort a stage: they are collected and shown in the detailed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    stage: Stage,
    path: PathBuf,
    message: String,
}

impl Warning {
    /// Creates a new warning for the given file.
    pub fn new<P: AsRef<Path>, M: fmt::Display>(stage: Stage, path: P, message: M) -> Self {
        Self {
            stage,
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Gets the stage that produced the warning.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Gets the path of the affected file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the warning message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.stage,
            self.path.display(),
            self.message
        )
    }
}
