//! Error types for the rendering scaffold.
//!
//! Every variant is fatal at the point it is raised: either startup aborts
//! before the loop driver starts, or the process terminates. There is no
//! retry policy and no graceful-degradation path. Steady-state draw calls
//! have no error channel at all.

use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// Errors produced during engine startup and resource loading.
#[derive(Debug, Error)]
pub enum Error {
    /// Window, GL context, or event-loop creation failed.
    #[error("initialization failed: {0}")]
    Init(String),

    /// A shader stage failed to compile. Carries the stage and the GL
    /// info log.
    #[error("{stage} shader compile error: {log}")]
    Compile {
        /// Which stage failed.
        stage: ShaderStage,
        /// The driver's info log for the failed compile.
        log: String,
    },

    /// Program linking failed.
    #[error("shader link error: {0}")]
    Link(String),

    /// Program validation failed after a successful link.
    #[error("shader validate error: {0}")]
    Validate(String),

    /// A uniform name was not found in the linked program. Indicates a
    /// mismatch between the shader source and the calling code.
    #[error("uniform not found: {0}")]
    UniformNotFound(String),

    /// A texture or shader resource file could not be opened or decoded.
    #[error("failed to load {path}: {reason}")]
    Load {
        /// The file that failed to load.
        path: PathBuf,
        /// Why it failed (I/O or decode error text).
        reason: String,
    },

    /// A GL object could not be allocated.
    #[error("GL allocation failed: {0}")]
    Gpu(String),
}

impl Error {
    /// Build a [`Error::Load`] from a path and any displayable cause.
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_carries_the_path() {
        let err = Error::load("textures/cobblestone.png", "no such file");
        assert_eq!(
            err.to_string(),
            "failed to load textures/cobblestone.png: no such file"
        );
    }

    #[test]
    fn compile_error_names_the_stage() {
        let err = Error::Compile {
            stage: ShaderStage::Fragment,
            log: "0:1: syntax error".into(),
        };
        assert!(err.to_string().starts_with("fragment shader compile error"));
    }
}
