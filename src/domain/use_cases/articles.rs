use validator::Validate;

use crate::{
    entities::article::{merge_article, Article, ArticlePatch, NewArticleRequest},
    errors::AppError,
    repositories::article::ArticleRepository,
    utils::valid_id::valid_id,
};

const INVALID_ID: &str = "Invalid article ID";
const NOT_FOUND: &str = "Article not found";

pub struct ArticleHandler<R>
where
    R: ArticleRepository,
{
    pub article_repo: R,
}

impl<R> ArticleHandler<R>
where
    R: ArticleRepository,
{
    pub fn new(article_repo: R) -> Self {
        ArticleHandler { article_repo }
    }

    /// Retrieves all articles that are not soft-deleted
    pub async fn list_articles(&self) -> Result<Vec<Article>, AppError> {
        self.article_repo
            .list_articles()
            .await
            .map_err(|e| e.storage_context("Failed to fetch articles"))
    }

    /// Retrieves an article by its ID
    pub async fn get_article(&self, id: &str) -> Result<Article, AppError> {
        let valid_id = valid_id(id, INVALID_ID)?;

        self.article_repo
            .get_article_by_id(valid_id)
            .await
            .map_err(|e| e.not_found_context(NOT_FOUND))
    }

    /// Creates a new article; the title must not be empty
    pub async fn create_article(&self, request: NewArticleRequest) -> Result<Article, AppError> {
        request.validate()?;

        let insert = request.prepare_for_insert();

        self.article_repo
            .create_article(&insert)
            .await
            .map_err(|e| e.storage_context("Failed to create article"))
    }

    /// Applies a partial update; empty fields leave stored values unchanged
    pub async fn update_article(&self, id: &str, patch: &ArticlePatch) -> Result<Article, AppError> {
        let existing = self.get_article(id).await?;

        let merged = merge_article(existing, patch);

        self.article_repo
            .update_article(&merged)
            .await
            .map_err(|e| e.not_found_context(NOT_FOUND).storage_context("Failed to update article"))
    }

    /// Soft-deletes an article. Absent ids are not an error.
    pub async fn delete_article(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_id(id, INVALID_ID)?;

        let affected = self.article_repo
            .soft_delete_article(valid_id)
            .await
            .map_err(|e| e.storage_context("Failed to delete article"))?;

        if affected == 0 {
            tracing::debug!("Article {} was already absent", valid_id);
        }

        Ok(())
    }
}
