use sqlx::SqlitePool;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, storage, utils};

use entities::image::UploadPolicy;
use repositories::sqlx_repo::{SqlxArticleRepo, SqlxImageRepo};
use storage::file_store::LocalFileStore;
use use_cases::{articles::ArticleHandler, images::ImageHandler};

pub struct AppState {
    pub article_handler: AppArticleHandler,
    pub image_handler: AppImageHandler,
}

pub type AppArticleHandler = ArticleHandler<SqlxArticleRepo>;
pub type AppImageHandler = ImageHandler<SqlxImageRepo>;

impl AppState {
    pub fn new(pool: SqlitePool, file_store: LocalFileStore, upload_policy: UploadPolicy) -> Self {
        let article_handler = ArticleHandler::new(SqlxArticleRepo::new(pool.clone()));
        let image_handler = ImageHandler::new(SqlxImageRepo::new(pool), file_store, upload_policy);

        AppState {
            article_handler,
            image_handler,
        }
    }
}
