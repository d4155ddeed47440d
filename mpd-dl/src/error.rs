use std::{io, path::PathBuf};
use thiserror::Error;

/// The error type returned by pipeline operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("required tool '{name}' not found in PATH. Install it and re-run.")]
    MissingTool { name: String },

    #[error("{program} exited with code {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("encrypted video not found at {}", .0.display())]
    MissingVideo(PathBuf),

    #[error(
        "no encrypted audio file found and no merged encrypted mp4 candidate in {}",
        .0.display()
    )]
    NoCandidate(PathBuf),

    #[error("decrypted video not found at {}, cannot create final output", .0.display())]
    NoDecryptedVideo(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, Error>;
