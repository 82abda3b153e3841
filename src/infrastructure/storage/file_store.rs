use std::{io, path::{Path, PathBuf}};

use tokio::{fs, io::AsyncWriteExt};
use tracing::info;

/// The upload directory on local disk. Entries are addressed by the full
/// path stored on the image record.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Opens the store, creating the directory tree if needed.
    pub async fn init(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!("Upload directory ready at {}", root.display());
        Ok(LocalFileStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copies the payload at `source` into the store under `file_name`
    /// and returns the written path and its byte length. An existing entry
    /// is never overwritten: the call fails with `AlreadyExists` instead.
    pub async fn save(&self, source: &Path, file_name: &str) -> io::Result<(PathBuf, u64)> {
        let target = self.root.join(file_name);
        let mut reader = fs::File::open(source).await?;
        let mut writer = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await?;

        let copied = async {
            let written = tokio::io::copy(&mut reader, &mut writer).await?;
            writer.flush().await?;
            Ok::<_, io::Error>(written)
        }
        .await;

        match copied {
            Ok(written) => Ok((target, written)),
            Err(e) => {
                // the entry was created by this call, so the partial file is ours
                let _ = fs::remove_file(&target).await;
                Err(e)
            }
        }
    }

    pub async fn exists(&self, path: &Path) -> io::Result<bool> {
        fs::try_exists(path).await
    }

    pub async fn open(&self, path: &Path) -> io::Result<fs::File> {
        fs::File::open(path).await
    }

    /// Removes an entry. A missing entry counts as removed.
    pub async fn remove(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
