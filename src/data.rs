//! Component database copying
//!
//! Users who want to add custom components alongside the stock ones first
//! copy the component database into a writable directory and point their
//! scene's `component_dir` at the copy.

use walkdir::WalkDir;

use std::fs;
use std::io;
use std::path::Path;

/// Copies every file of the component database at `source` into
/// `dest/aerosol_components`, creating the directory if needed. Returns the
/// number of files copied.
pub fn copy_component_data(source: &Path, dest: &Path) -> io::Result<usize> {
    let target = dest.join("aerosol_components");
    fs::create_dir_all(&target)?;

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() {
            fs::copy(entry.path(), target.join(entry.file_name()))?;
            copied += 1;
        }
    }
    Ok(copied)
}
