use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Write one generated file, creating its directory if it does not exist.
/// The file handle lives only for the duration of the write.
pub fn write_generated_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
