//! File-level driver: source in, `.c` and `.h` out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::compiler::{compile_module, CompilerOptions};

/// Implementation and interface paths for `source`: the extension is
/// replaced by `.c` and `.h`, or appended when there is none.
#[must_use]
pub fn output_paths(source: &Path) -> (PathBuf, PathBuf) {
    (source.with_extension("c"), source.with_extension("h"))
}

/// Compile the module in `path` and write both units next to it.
///
/// Nothing is written unless the whole module compiles; on failure any
/// outputs left over from an earlier run are removed so no stale pair
/// survives.
///
/// # Errors
/// If the source cannot be read, fails to compile, or an output cannot be
/// written
pub fn compile_file(path: &Path, options: &CompilerOptions) -> Result<()> {
    let source = fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    let (c_path, h_path) = output_paths(path);
    let header_name = h_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output = match compile_module(&path.display().to_string(), &source, &header_name, options) {
        Ok(output) => output,
        Err(error) => {
            remove_stale(&c_path)?;
            remove_stale(&h_path)?;
            return Err(error.into());
        }
    };

    fs::write(&c_path, &output.implementation)
        .with_context(|| format!("failed to write '{}'", c_path.display()))?;
    fs::write(&h_path, &output.interface).with_context(|| format!("failed to write '{}'", h_path.display()))?;
    tracing::debug!(c = %c_path.display(), h = %h_path.display(), "wrote outputs");
    Ok(())
}

fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error).with_context(|| format!("failed to remove '{}'", path.display())),
    }
}
