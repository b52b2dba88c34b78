use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::entry::{Entry, EntryRow};
use crate::store::{CategoryCount, EntryOrder, EntryQuery, EntryStore};

/// Postgres-backed entry store. One `entries` table; the variant payload lives in `data`.
#[derive(Clone)]
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_entries(rows: Vec<EntryRow>) -> Result<Vec<Entry>> {
    rows.into_iter()
        .map(|row| {
            let id = row.id;
            Entry::try_from(row).with_context(|| format!("Entry {id} has a malformed payload"))
        })
        .collect()
}

/// Builds an ILIKE pattern that matches `text` literally anywhere in a column.
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>("SELECT * FROM entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Entry::try_from)
            .transpose()
            .with_context(|| format!("Entry {id} has a malformed payload"))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Entry>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = sqlx::query_as::<_, EntryRow>("SELECT * FROM entries WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        into_entries(rows)
    }

    async fn find_many(&self, query: &EntryQuery) -> Result<Vec<Entry>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM entries WHERE TRUE");

        if let Some(entry_type) = query.entry_type {
            builder.push(" AND entry_type = ").push_bind(entry_type.as_str());
        }
        if let Some(category) = &query.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(tag) = &query.tag {
            builder.push(" AND ").push_bind(tag.clone()).push(" = ANY(tags)");
        }
        if let Some(exclude_id) = query.exclude_id {
            builder.push(" AND id <> ").push_bind(exclude_id);
        }

        match query.order {
            EntryOrder::Inserted => builder.push(" ORDER BY created_at ASC, id ASC"),
            EntryOrder::DateDesc => builder.push(" ORDER BY date DESC, created_at DESC"),
        };

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder
            .build_query_as::<EntryRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!("find_many {:?} returned {} rows", query, rows.len());
        into_entries(rows)
    }

    async fn search(&self, text: &str, limit: i64) -> Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT *
            FROM entries
            WHERE title ILIKE $1
               OR content ILIKE $1
               OR category ILIKE $1
               OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $1)
               OR data->>'notes' ILIKE $1
               OR data->>'whatWasDone' ILIKE $1
               OR EXISTS (
                    SELECT 1 FROM jsonb_array_elements_text(
                        CASE WHEN jsonb_typeof(data->'toolsUsed') = 'array'
                             THEN data->'toolsUsed' ELSE '[]'::jsonb END
                    ) AS tool
                    WHERE tool ILIKE $1
               )
               OR data->>'impact' ILIKE $1
               OR data->>'learned' ILIKE $1
               OR data->>'companyName' ILIKE $1
               OR data->>'jobTitle' ILIKE $1
               OR data->>'institution' ILIKE $1
               OR data->>'qualification' ILIKE $1
            ORDER BY date DESC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(text))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn categories(&self) -> Result<Vec<CategoryCount>> {
        Ok(sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM entries GROUP BY category ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert(&self, entry: &Entry) -> Result<()> {
        let data = serde_json::to_value(&entry.kind)?;

        sqlx::query(
            r#"
            INSERT INTO entries
                (id, entry_type, title, content, date, category, tags, images,
                 related_to, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(entry.id)
        .bind(entry.entry_type().as_str())
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.date)
        .bind(&entry.category)
        .bind(&entry.tags)
        .bind(&entry.images)
        .bind(&entry.related_to)
        .bind(data)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        info!("Inserted {} entry {}", entry.entry_type().as_str(), entry.id);
        Ok(())
    }

    async fn replace(&self, entry: &Entry) -> Result<bool> {
        let data = serde_json::to_value(&entry.kind)?;

        let result = sqlx::query(
            r#"
            UPDATE entries
            SET entry_type = $2, title = $3, content = $4, date = $5, category = $6,
                tags = $7, images = $8, related_to = $9, data = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(entry.id)
        .bind(entry.entry_type().as_str())
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.date)
        .bind(&entry.category)
        .bind(&entry.tags)
        .bind(&entry.images)
        .bind(&entry.related_to)
        .bind(data)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("Deleted entry {id}");
        }
        Ok(result.rows_affected() > 0)
    }
}
