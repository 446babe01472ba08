use crate::artifacts::core::error::{Error, IoContext, Result};
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Prefix of in-flight temporary files; never a valid ref or object name
pub const TEMP_FILE_PREFIX: &str = ".tmp-";

/// Replace `path` with `content` so readers see either the old or the new bytes
///
/// The content is written to a temporary file in the destination directory,
/// flushed to disk, then renamed over the destination.
pub fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;

    std::fs::create_dir_all(parent)
        .io_context(|| format!("Unable to create directory {}", parent.display()))?;

    let temp_path = temp_path_in(parent);

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .io_context(|| format!("Unable to open temporary file {}", temp_path.display()))?;

    let written = file
        .write_all(content)
        .and_then(|_| file.sync_all())
        .io_context(|| format!("Unable to write temporary file {}", temp_path.display()));

    if let Err(error) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(error);
    }

    std::fs::rename(&temp_path, path).io_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Unable to rename temporary file to {}", path.display())
    })
}

fn temp_path_in(dir: &Path) -> PathBuf {
    dir.join(format!("{TEMP_FILE_PREFIX}{:08x}", rand::random::<u32>()))
}
