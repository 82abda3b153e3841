use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::article::{ArticlePatch, NewArticleRequest}, errors::AppError, AppState};

#[instrument(skip(state))]
pub async fn list_articles(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let articles = state.article_handler.list_articles().await?;
    Ok(HttpResponse::Ok().json(articles))
}

#[instrument(skip(state))]
pub async fn get_article(
    article_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let article = state.article_handler.get_article(&article_id).await?;
    Ok(HttpResponse::Ok().json(article))
}

#[instrument(skip(state, data))]
pub async fn create_article(
    state: web::Data<AppState>,
    data: web::Json<NewArticleRequest>,
) -> Result<impl Responder, AppError> {
    let article = state.article_handler
        .create_article(data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(article))
}

#[instrument(skip(state, data))]
pub async fn update_article(
    article_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ArticlePatch>,
) -> Result<impl Responder, AppError> {
    let article = state.article_handler
        .update_article(&article_id, &data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(article))
}

#[instrument(skip(state))]
pub async fn delete_article(
    article_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.article_handler.delete_article(&article_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Article deleted successfully"})))
}
