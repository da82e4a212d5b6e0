use std::ffi::OsString;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

use banstore_application::error::AppError;

pub fn storage_error(context: &str, path: &Path) -> impl FnOnce(io::Error) -> AppError {
    let message = format!("{} {}", context, path.display());
    move |e| AppError::StorageError {
        message: format!("{}: {}", message, e),
    }
}

pub async fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .await
            .map_err(storage_error("Failed to create directory", dir)),
        _ => Ok(()),
    }
}

/// Replaces `backup` with a copy of `current`. Missing files on either side are not errors.
pub async fn rotate_backup(current: &Path, backup: &Path) -> Result<(), AppError> {
    match fs::remove_file(backup).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(storage_error("Failed to remove old backup", backup)(e)),
    }

    match fs::copy(current, backup).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(storage_error("Failed to back up", current)(e)),
    }
}

/// Writes `contents` to a sibling temp file, syncs it, then renames it over `path`.
pub async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    let temp_path = temp_sibling(path);

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(storage_error("Failed to create", &temp_path))?;
    file.write_all(contents)
        .await
        .map_err(storage_error("Failed to write", &temp_path))?;
    file.flush()
        .await
        .map_err(storage_error("Failed to flush", &temp_path))?;
    file.sync_all()
        .await
        .map_err(storage_error("Failed to sync", &temp_path))?;
    drop(file);

    fs::rename(&temp_path, path)
        .await
        .map_err(storage_error("Failed to replace", path))
}

pub async fn append(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(storage_error("Failed to open", path))?;
    file.write_all(contents)
        .await
        .map_err(storage_error("Failed to append to", path))?;
    file.flush()
        .await
        .map_err(storage_error("Failed to flush", path))
}

/// Reads a text file, replacing invalid UTF-8 instead of failing. `None` when absent.
pub async fn read_lossy(path: &Path) -> Result<Option<String>, AppError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(storage_error("Failed to read", path)(e)),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn atomic_write_replaces_contents_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");

        write_atomically(&path, b"first").await.unwrap();
        write_atomically(&path, b"second").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "second");
        assert!(!fs::try_exists(temp_sibling(&path)).await.unwrap());
    }

    #[tokio::test]
    async fn backup_rotation_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        let current = dir.path().join("data.txt");
        let backup = dir.path().join("data_bk.txt");

        rotate_backup(&current, &backup).await.unwrap();
        assert!(!fs::try_exists(&backup).await.unwrap());

        fs::write(&current, "v1").await.unwrap();
        rotate_backup(&current, &backup).await.unwrap();
        fs::write(&current, "v2").await.unwrap();
        rotate_backup(&current, &backup).await.unwrap();

        assert_eq!(fs::read_to_string(&backup).await.unwrap(), "v2");
    }

    #[tokio::test]
    async fn lossy_read_survives_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, b"ok\xffline").await.unwrap();

        let text = read_lossy(&path).await.unwrap().unwrap();
        assert!(text.starts_with("ok"));
        assert!(read_lossy(&dir.path().join("missing")).await.unwrap().is_none());
    }
}
