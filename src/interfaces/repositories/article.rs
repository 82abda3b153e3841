use async_trait::async_trait;
use chrono::Utc;
use sqlx::{self, SqlitePool};

use crate::{
    entities::article::{Article, ArticleInsert},
    errors::AppError,
    repositories::sqlx_repo::{select_active, soft_delete_sql, SqlxArticleRepo, NOT_DELETED},
};

#[async_trait]
pub trait ArticleRepository: Sync + Send {
    async fn list_articles(&self) -> Result<Vec<Article>, AppError>;
    async fn get_article_by_id(&self, id: i64) -> Result<Article, AppError>;
    async fn create_article(&self, article: &ArticleInsert) -> Result<Article, AppError>;
    async fn update_article(&self, article: &Article) -> Result<Article, AppError>;
    /// Returns the number of rows marked deleted (0 when absent or already deleted).
    async fn soft_delete_article(&self, id: i64) -> Result<u64, AppError>;
}

impl SqlxArticleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqlxArticleRepo { pool }
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepo {
    async fn list_articles(&self) -> Result<Vec<Article>, AppError> {
        let mut builder = select_active("articles");
        builder.push(" ORDER BY id");

        let query = builder.build_query_as::<Article>();
        let articles = query.fetch_all(&self.pool).await?;

        Ok(articles)
    }

    async fn get_article_by_id(&self, id: i64) -> Result<Article, AppError> {
        let mut builder = select_active("articles");
        builder.push(" AND id = ").push_bind(id);

        let query = builder.build_query_as::<Article>();
        let article = query.fetch_one(&self.pool).await?;

        Ok(article)
    }

    async fn create_article(&self, article: &ArticleInsert) -> Result<Article, AppError> {
        let created = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.created_at)
        .bind(article.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_article(&self, article: &Article) -> Result<Article, AppError> {
        let sql = format!(
            "UPDATE articles SET title = ?, content = ?, updated_at = ? WHERE id = ? AND {} RETURNING *",
            NOT_DELETED
        );

        let updated = sqlx::query_as::<_, Article>(&sql)
            .bind(&article.title)
            .bind(&article.content)
            .bind(Utc::now())
            .bind(article.id)
            .fetch_one(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn soft_delete_article(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(&soft_delete_sql("articles"))
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
