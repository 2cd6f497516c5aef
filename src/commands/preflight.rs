//! Checks that must pass before anything is written.

use crate::config::Config;
use crate::platform::IcnsBackend;
use std::path::PathBuf;

/// Fatal problems detected before the run starts.
#[derive(Debug)]
pub enum PreflightError {
    /// The SVG source does not exist.
    InputNotFound(PathBuf),
    /// A required external tool is not installed.
    ToolNotFound { tool: PathBuf, reason: String },
}

impl std::fmt::Display for PreflightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreflightError::InputNotFound(path) => {
                write!(f, "SVG file not found: {}", path.display())
            }
            PreflightError::ToolNotFound { tool, reason } => {
                write!(f, "required tool '{}' not found: {}", tool.display(), reason)
            }
        }
    }
}

impl std::error::Error for PreflightError {}

/// Verify runtime dependencies and the input file.
///
/// Only an explicitly requested iconutil backend makes the tool mandatory.
/// With `auto`, a missing tool surfaces later as a skipped ICNS step.
pub fn run(config: &Config) -> Result<(), PreflightError> {
    if config.icns_backend == IcnsBackend::Iconutil {
        let found = which::which(&config.iconutil).map_err(|e| PreflightError::ToolNotFound {
            tool: config.iconutil.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("using iconutil at {}", found.display());
    }

    if !config.input.is_file() {
        return Err(PreflightError::InputNotFound(config.input.clone()));
    }

    Ok(())
}
