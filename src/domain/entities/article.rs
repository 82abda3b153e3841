use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct ArticleInsert {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewArticleRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub content: Option<String>,
}

/// Partial update body. A field that is missing, `null` or `""` leaves
/// the stored value as it is; it never clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl NewArticleRequest {
    pub fn prepare_for_insert(self) -> ArticleInsert {
        let now = Utc::now();
        ArticleInsert {
            title: self.title,
            content: self.content.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-by-field merge of `patch` over `existing`: empty means unchanged.
pub fn merge_article(existing: Article, patch: &ArticlePatch) -> Article {
    Article {
        title: overwrite_if_present(existing.title, patch.title.as_deref()),
        content: overwrite_if_present(existing.content, patch.content.as_deref()),
        ..existing
    }
}

fn overwrite_if_present(current: String, incoming: Option<&str>) -> String {
    match incoming {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => current,
    }
}
