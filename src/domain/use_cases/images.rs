use std::{io, path::{Path, PathBuf}};

use chrono::Utc;
use tracing::{error, warn};

use crate::{
    entities::image::{Image, ImageFile, ImageInsert, ImageUpload, UploadPolicy},
    errors::AppError,
    repositories::image::ImageRepository,
    storage::file_store::LocalFileStore,
    utils::{
        file_names::{display_name, stored_file_name},
        mime_types::mime_type_for_extension,
        valid_id::valid_id,
    },
};

const INVALID_ID: &str = "Invalid image ID";
const NOT_FOUND: &str = "Image not found";
const FILE_NOT_FOUND: &str = "Image file not found";
const SAVE_ATTEMPTS: u32 = 3;

pub struct ImageHandler<R>
where
    R: ImageRepository,
{
    pub image_repo: R,
    pub file_store: LocalFileStore,
    pub upload_policy: UploadPolicy,
}

impl<R> ImageHandler<R>
where
    R: ImageRepository,
{
    pub fn new(image_repo: R, file_store: LocalFileStore, upload_policy: UploadPolicy) -> Self {
        ImageHandler { image_repo, file_store, upload_policy }
    }

    pub async fn list_images(&self) -> Result<Vec<Image>, AppError> {
        self.image_repo
            .list_images()
            .await
            .map_err(|e| e.storage_context("Failed to fetch images"))
    }

    pub async fn get_image(&self, id: &str) -> Result<Image, AppError> {
        let valid_id = valid_id(id, INVALID_ID)?;

        self.image_repo
            .get_image_by_id(valid_id)
            .await
            .map_err(|e| e.not_found_context(NOT_FOUND))
    }

    /// Validates the received part, copies it into the file store and
    /// records it. If the record cannot be written the copied file is
    /// removed again before the error is returned.
    pub async fn upload_image(&self, upload: Option<ImageUpload>) -> Result<Image, AppError> {
        let upload = upload.ok_or_else(no_file_provided)?;
        let filename = upload.filename
            .as_deref()
            .map(display_name)
            .filter(|name| !name.is_empty())
            .ok_or_else(no_file_provided)?;

        self.upload_policy.check_size(upload.size)?;
        let ext = self.upload_policy.check_extension(filename)?;

        let (path, written) = self.store_payload(&upload.source, filename).await?;

        let now = Utc::now();
        let insert = ImageInsert {
            filename: filename.to_string(),
            path: path.to_string_lossy().into_owned(),
            size: i64::try_from(written).unwrap_or(i64::MAX),
            mime_type: mime_type_for_extension(ext),
            created_at: now,
            updated_at: now,
        };

        match self.image_repo.create_image(&insert).await {
            Ok(image) => Ok(image),
            Err(e) => {
                if let Err(cleanup) = self.file_store.remove(&path).await {
                    error!("Failed to remove orphaned upload {}: {}", path.display(), cleanup);
                }
                Err(e.storage_context("Failed to save image record"))
            }
        }
    }

    /// Writes the payload under a fresh `<nanos>_<name>`. A name that is
    /// already taken belongs to another upload, so it is never reused.
    async fn store_payload(&self, source: &Path, filename: &str) -> Result<(PathBuf, u64), AppError> {
        let mut attempt = 1;
        loop {
            let stored_name = stored_file_name(filename);
            match self.file_store.save(source, &stored_name).await {
                Ok(saved) => return Ok(saved),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < SAVE_ATTEMPTS => {
                    warn!("Stored name {} already taken, retrying", stored_name);
                    attempt += 1;
                }
                Err(e) => {
                    error!("Failed to save file {}: {}", stored_name, e);
                    return Err(AppError::StorageError("Failed to save image".into()));
                }
            }
        }
    }

    /// Looks the record up and opens its payload. A record whose file has
    /// gone missing is reported as `NotFound`.
    pub async fn open_image_file(&self, id: &str) -> Result<ImageFile, AppError> {
        let image = self.get_image(id).await?;
        let path = Path::new(&image.path);

        let exists = self.file_store.exists(path).await.map_err(|e| {
            error!("Failed to stat image file {}: {}", image.path, e);
            AppError::StorageError("Failed to open image file".into())
        })?;
        if !exists {
            return Err(AppError::NotFound(FILE_NOT_FOUND.into()));
        }

        let file = self.file_store.open(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AppError::NotFound(FILE_NOT_FOUND.into()),
            _ => {
                error!("Failed to open image file {}: {}", image.path, e);
                AppError::StorageError("Failed to open image file".into())
            }
        })?;

        Ok(ImageFile { image, file })
    }

    /// Removes the payload (best effort) and soft-deletes the record.
    pub async fn delete_image(&self, id: &str) -> Result<(), AppError> {
        let image = self.get_image(id).await?;

        if let Err(e) = self.file_store.remove(Path::new(&image.path)).await {
            warn!("Failed to delete image file {}: {}", image.path, e);
        }

        self.image_repo
            .soft_delete_image(image.id)
            .await
            .map_err(|e| e.storage_context("Failed to delete image record"))?;

        Ok(())
    }
}

fn no_file_provided() -> AppError {
    AppError::InvalidInput("No image file provided".into())
}
