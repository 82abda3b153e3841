pub mod article;
pub mod image;
pub mod sqlx_repo;
