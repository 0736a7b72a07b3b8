use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{GenerateError, Result};

/// Destination of rendered artifacts.
pub trait ArtifactSink {
    /// Stores one artifact. `name` has no extension.
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()>;

    /// Where an artifact ends up, for error messages.
    fn location(&self, name: &str) -> PathBuf {
        PathBuf::from(name)
    }
}

/// Writes `<dir>/<name>.cs`.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        fs::write(self.location(name), contents)
    }

    fn location(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.cs"))
    }
}

/// Keeps artifacts in memory, ordered by name.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }

    pub fn artifacts(&self) -> &BTreeMap<String, String> {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> BTreeMap<String, String> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        self.artifacts.insert(name.to_owned(), contents.to_owned());
        Ok(())
    }
}

/// Makes `dir` ready to receive artifacts.
///
/// The directory is created when missing. If it already holds files, they
/// are either refused (`force_clear == false`) or their `.cs` files are
/// deleted. Deletion is not transactional.
pub fn prepare_output_dir(dir: &Path, force_clear: bool) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| GenerateError::io(dir, err))?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| GenerateError::io(dir, err))? {
        let path = entry.map_err(|err| GenerateError::io(dir, err))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Ok(());
    }
    if !force_clear {
        return Err(GenerateError::OutputNotEmpty(dir.to_path_buf()));
    }

    let mut removed = 0usize;
    for path in files {
        if path.extension().is_some_and(|ext| ext == "cs") {
            fs::remove_file(&path).map_err(|err| GenerateError::io(&path, err))?;
            debug!(path = %path.display(), "removed stale artifact");
            removed += 1;
        }
    }
    info!(dir = %dir.display(), removed, "cleared output directory");
    Ok(())
}
