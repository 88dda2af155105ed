//! Notebook-to-HTML conversion backend.
//!
//! The [`NotebookConverter`] trait is the seam between the renderer and the
//! external conversion tool. The production implementation,
//! [`NbconvertBackend`], shells out to `jupyter nbconvert` with the command
//! line from `[converter]` in `config.toml`. Tests substitute a mock that
//! writes canned HTML.

use crate::config::ConverterConfig;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("`{program}` failed on {notebook} ({status}): {stderr}")]
    Failed {
        program: String,
        notebook: PathBuf,
        status: String,
        stderr: String,
    },
    #[error("Converter did not produce {0}")]
    MissingOutput(PathBuf),
}

/// Converts a notebook into an HTML fragment on disk.
pub trait NotebookConverter {
    /// Convert `notebook`, returning the path of the HTML file the tool wrote.
    ///
    /// The file is expected next to the notebook with an `.html` extension.
    /// The caller takes ownership of it (typically by moving it away).
    fn convert(&self, notebook: &Path) -> Result<PathBuf, ConvertError>;
}

/// Path the converter is expected to write for `notebook`.
pub fn expected_output(notebook: &Path) -> PathBuf {
    notebook.with_extension("html")
}

/// Runs the configured external command, synchronously.
#[derive(Debug, Clone)]
pub struct NbconvertBackend {
    program: String,
    args: Vec<String>,
}

impl NbconvertBackend {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    /// The full argument list for `notebook`, program excluded.
    pub fn command_args(&self, notebook: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(notebook.to_string_lossy().to_string());
        args
    }
}

impl NotebookConverter for NbconvertBackend {
    fn convert(&self, notebook: &Path) -> Result<PathBuf, ConvertError> {
        let output = Command::new(&self.program)
            .args(self.command_args(notebook))
            .output()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                notebook: notebook.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let produced = expected_output(notebook);
        if !produced.exists() {
            return Err(ConvertError::MissingOutput(produced));
        }
        Ok(produced)
    }
}
