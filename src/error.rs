// Error taxonomy for the compression pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a compression run.
///
/// Each variant maps to its own exit code so scripts can tell a missing
/// tool apart from a bad input or a failed encode.
#[derive(Debug, Error)]
pub enum ShrinkError {
    #[error("{tool} not found at '{path}'. Is it installed and in PATH?")]
    ToolNotFound { tool: String, path: String },

    #[error("could not probe '{}': {}", .path.display(), .reason)]
    ProbeFailed { path: PathBuf, reason: String },

    #[error("ffmpeg exited with {}", exit_desc(.status))]
    EncodeFailed {
        /// Exit code when the process ran to completion; None when it was
        /// killed by a signal or never produced a status.
        status: Option<i32>,
        /// Last few lines of ffmpeg's stderr, for the top-level handler.
        stderr_tail: String,
    },
}

fn exit_desc(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("code {}", code),
        None => "no exit code (killed by a signal?)".to_string(),
    }
}

impl ShrinkError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ShrinkError::ToolNotFound { .. } => 1,
            ShrinkError::ProbeFailed { .. } => 2,
            ShrinkError::EncodeFailed { .. } => 3,
        }
    }
}
