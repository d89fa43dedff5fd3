use deadpool_postgres::Pool;
use tokio_postgres::Row;

use super::{Document, DocumentStore, Order};
use crate::error::{AppError, Result};

/// Documents kept as JSONB rows in a single `documents` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool,
}

impl PgDocumentStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn row_to_document(row: &Row) -> Result<Document> {
    row.try_get("body").map_err(AppError::from)
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT body FROM documents WHERE collection = $1 AND id = $2",
                &[&collection, &id],
            )
            .await?;
        row.map(|r| row_to_document(&r)).transpose()
    }

    async fn put(&self, collection: &str, id: &str, body: Document) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                INSERT INTO documents (collection, id, body)
                VALUES ($1, $2, $3)
                ON CONFLICT (collection, id)
                DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
                "#,
                &[&collection, &id, &body],
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let client = self.pool.get().await?;
        let removed = client
            .execute(
                "DELETE FROM documents WHERE collection = $1 AND id = $2",
                &[&collection, &id],
            )
            .await?;
        Ok(removed > 0)
    }

    async fn find_by_field(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Document>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT body FROM documents
                WHERE collection = $1 AND body ->> $2::text = $3::text
                ORDER BY id ASC
                "#,
                &[&collection, &field, &value],
            )
            .await?;
        rows.iter().map(row_to_document).collect()
    }

    async fn list(&self, collection: &str, order: Order) -> Result<Vec<Document>> {
        let client = self.pool.get().await?;
        let query = match order {
            Order::Ascending => "SELECT body FROM documents WHERE collection = $1 ORDER BY id ASC",
            Order::Descending => "SELECT body FROM documents WHERE collection = $1 ORDER BY id DESC",
        };
        let rows = client.query(query, &[&collection]).await?;
        rows.iter().map(row_to_document).collect()
    }
}
