use crate::codec::CodecError;
use crate::constants::EXIT_FAILURE;
use crate::planner::DegenerateVariant;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResizerError {
    /// Rendered clap message, already carrying its own usage block.
    #[error("{0}")]
    Usage(String),

    #[error("Stat Error: {}: {source}", .path.display())]
    PathStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Reading Error: {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Open Error: {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Decode Error: {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Resize Error: {}: {source}", .path.display())]
    Resize {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("File Create Error: {}: {source}", .path.display())]
    FileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest Write Error: {}: {source}", .path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Size Error: {}: {source}", .path.display())]
    Size {
        path: PathBuf,
        #[source]
        source: DegenerateVariant,
    },

    #[error("Density Error: {}: file name has no @2x or @3x marker", .0.display())]
    MissingDensityMarker(PathBuf),

    #[error("{failed} failures while processing {total} source files")]
    Batch { failed: usize, total: usize },
}

impl ResizerError {
    /// Process exit status for this failure. Every kind maps to 1.
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

pub type Result<T> = std::result::Result<T, ResizerError>;
