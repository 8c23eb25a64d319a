use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Replace the contents of `path` by writing a sibling temp file and renaming it
/// over the original. The original's permissions are carried over. On failure
/// the temp file is removed and the original is left as it was.
///
/// Hard-linked files and files in a directory that refuses new entries are
/// overwritten in place instead, so the inode and owner stay the same.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    if has_other_links(path) {
        return fs::write(path, content);
    }

    let tmp_path = temp_sibling(path)?;

    if let Err(e) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return match e.kind() {
            io::ErrorKind::PermissionDenied => fs::write(path, content),
            _ => Err(e),
        };
    }

    let result = match fs::metadata(path) {
        Ok(meta) => fs::set_permissions(&tmp_path, meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
    .and_then(|_| fs::rename(&tmp_path, path));

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

#[cfg(unix)]
fn has_other_links(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    fs::metadata(path).is_ok_and(|meta| meta.nlink() > 1)
}

#[cfg(not(unix))]
fn has_other_links(_path: &Path) -> bool {
    false
}

fn temp_sibling(path: &Path) -> io::Result<PathBuf> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid path: {}", path.display()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid path: {}", path.display()),
        )
    })?;

    Ok(parent.join(format!(
        ".{}.slugswap-{}.tmp",
        filename.to_string_lossy(),
        std::process::id()
    )))
}
