use async_trait::async_trait;
use chrono::Utc;
use sqlx::{self, SqlitePool};

use crate::{
    entities::image::{Image, ImageInsert},
    errors::AppError,
    repositories::sqlx_repo::{select_active, soft_delete_sql, SqlxImageRepo},
};

#[async_trait]
pub trait ImageRepository: Sync + Send {
    async fn list_images(&self) -> Result<Vec<Image>, AppError>;
    async fn get_image_by_id(&self, id: i64) -> Result<Image, AppError>;
    async fn create_image(&self, image: &ImageInsert) -> Result<Image, AppError>;
    async fn soft_delete_image(&self, id: i64) -> Result<u64, AppError>;
}

impl SqlxImageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqlxImageRepo { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn list_images(&self) -> Result<Vec<Image>, AppError> {
        let mut builder = select_active("images");
        builder.push(" ORDER BY id");

        let query = builder.build_query_as::<Image>();
        let images = query.fetch_all(&self.pool).await?;

        Ok(images)
    }

    async fn get_image_by_id(&self, id: i64) -> Result<Image, AppError> {
        let mut builder = select_active("images");
        builder.push(" AND id = ").push_bind(id);

        let query = builder.build_query_as::<Image>();
        let image = query.fetch_one(&self.pool).await?;

        Ok(image)
    }

    async fn create_image(&self, image: &ImageInsert) -> Result<Image, AppError> {
        let created = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (filename, path, size, mime_type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&image.filename)
        .bind(&image.path)
        .bind(image.size)
        .bind(&image.mime_type)
        .bind(image.created_at)
        .bind(image.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn soft_delete_image(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(&soft_delete_sql("images"))
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::sqlx_repo::test_pool::memory_pool;

    fn insert(path: &str) -> ImageInsert {
        let now = Utc::now();
        ImageInsert {
            filename: "cat.png".into(),
            path: path.into(),
            size: 3,
            mime_type: "image/png".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips_metadata() {
        let repo = SqlxImageRepo::new(memory_pool().await);

        let created = repo.create_image(&insert("uploads/1_cat.png")).await.unwrap();
        let fetched = repo.get_image_by_id(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.size, 3);
        assert_eq!(fetched.mime_type, "image/png");
    }

    #[tokio::test]
    async fn duplicate_paths_are_rejected_as_storage_errors() {
        let repo = SqlxImageRepo::new(memory_pool().await);
        repo.create_image(&insert("uploads/1_cat.png")).await.unwrap();

        let result = repo.create_image(&insert("uploads/1_cat.png")).await;

        assert!(matches!(result, Err(AppError::StorageError(_))));
    }

    #[tokio::test]
    async fn soft_deleted_images_are_hidden_from_reads() {
        let repo = SqlxImageRepo::new(memory_pool().await);
        let image = repo.create_image(&insert("uploads/2_cat.png")).await.unwrap();

        assert_eq!(repo.soft_delete_image(image.id).await.unwrap(), 1);

        assert!(repo.list_images().await.unwrap().is_empty());
        assert!(matches!(repo.get_image_by_id(image.id).await, Err(AppError::NotFound(_))));
    }
}
