use crate::Result;
use dashmap::DashMap;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One lock per output file, shared by every writer in the process.
static APPEND_LOCKS: LazyLock<DashMap<PathBuf, Arc<Mutex<()>>>> = LazyLock::new(DashMap::new);

/// Appends a compiled template to the shared output file, creating the file
/// and its parent directories when missing.
///
/// Appends to the same path are serialized within this process; separate
/// processes writing the same file are not coordinated.
pub async fn append(path: &Path, compiled: &str) -> Result<()> {
    let lock = APPEND_LOCKS
        .entry(path.to_path_buf())
        .or_default()
        .value()
        .clone();
    let _guard = lock.lock().await;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(compiled.as_bytes()).await?;
    file.flush().await?;

    debug!("Appended {} bytes to {}", compiled.len(), path.display());
    Ok(())
}
