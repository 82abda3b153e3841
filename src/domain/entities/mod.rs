pub mod article;
pub mod image;
