use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use periodical_logging::{periodical_debug, periodical_warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to run compiler {binary:?}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("compiler produced no output at {0:?}")]
    MissingOutput(PathBuf),
}

/// Turns a rendered package manifest into the final e-book file.
pub trait Compiler: Send + Sync {
    /// Compile `manifest` and return the path of the produced file, which
    /// lives next to the manifest.
    fn compile(&self, manifest: &Path, verbose: bool) -> Result<PathBuf, CompileError>;
}

/// Invokes `kindlegen -verbose <manifest>`.
#[derive(Debug, Clone)]
pub struct KindlegenCompiler {
    pub binary: PathBuf,
}

impl Default for KindlegenCompiler {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("kindlegen"),
        }
    }
}

impl KindlegenCompiler {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Compiler for KindlegenCompiler {
    fn compile(&self, manifest: &Path, verbose: bool) -> Result<PathBuf, CompileError> {
        let mut command = Command::new(&self.binary);
        command.arg("-verbose").arg(manifest).stdin(Stdio::null());
        if !verbose {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().map_err(|source| CompileError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;
        // kindlegen exits non-zero for mere warnings, so only the output counts.
        if !status.success() {
            periodical_warn!("{} exited with {}", self.binary.display(), status);
        }

        let output = manifest.with_extension("mobi");
        if !output.is_file() {
            return Err(CompileError::MissingOutput(output));
        }
        Ok(output)
    }
}

/// Shows a kept intermediate file to the operator.
pub trait Opener: Send + Sync {
    fn open(&self, path: &Path);
}

/// Opens files with `xdg-open`; a missing tool is not an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct XdgOpener;

impl Opener for XdgOpener {
    fn open(&self, path: &Path) {
        periodical_debug!("Opening {} with xdg-open", path.display());
        if let Err(err) = Command::new("xdg-open").arg(path).status() {
            periodical_debug!("xdg-open unavailable: {}", err);
        }
    }
}
