use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Predicate every read of a soft-deletable table must carry.
pub const NOT_DELETED: &str = "deleted_at IS NULL";

/// `SELECT * FROM <table> WHERE deleted_at IS NULL`, ready for more
/// `AND ...` clauses.
pub fn select_active<'args>(table: &str) -> QueryBuilder<'args, Sqlite> {
    QueryBuilder::new(format!("SELECT * FROM {} WHERE {}", table, NOT_DELETED))
}

/// `UPDATE <table> SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL`
pub fn soft_delete_sql(table: &str) -> String {
    format!("UPDATE {} SET deleted_at = ? WHERE id = ? AND {}", table, NOT_DELETED)
}

#[derive(Clone)]
pub struct SqlxArticleRepo {
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxImageRepo {
    pub pool: SqlitePool,
}

#[cfg(test)]
pub(crate) mod test_pool {
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use crate::db::sqlite::run_migrations;

    /// Single-connection in-memory database with the schema applied.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        run_migrations(&pool).await.expect("Failed to run migrations");
        pool
    }
}
