//! Postgres store backend (sqlx).

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::{ContactMessage, NewContactMessage, NewProject, Project, ProjectUpdate};
use crate::store::{MessageStore, ProjectStore, StoreError};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert(&self, new: NewProject) -> Result<Project, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, category, thumbnail_url, media_urls, tags, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, category, thumbnail_url, media_urls, tags, featured
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.thumbnail_url)
        .bind(&new.media_urls)
        .bind(&new.tags)
        .bind(new.featured)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get(&self, id: i32) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, category, thumbnail_url, media_urls, tags, featured
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<Project>, StoreError> {
        let projects = if let Some(category) = category {
            sqlx::query_as::<_, Project>(
                r#"
                SELECT id, title, description, category, thumbnail_url, media_urls, tags, featured
                FROM projects
                WHERE category = $1
                ORDER BY id
                "#,
            )
            .bind(category)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Project>(
                r#"
                SELECT id, title, description, category, thumbnail_url, media_urls, tags, featured
                FROM projects
                ORDER BY id
                "#,
            )
            .fetch_all(&self.pool)
            .await?
        };

        Ok(projects)
    }

    async fn update(&self, id: i32, update: ProjectUpdate) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = $1, description = $2, category = $3, thumbnail_url = $4,
                media_urls = $5, tags = $6, featured = $7
            WHERE id = $8
            RETURNING id, title, description, category, thumbnail_url, media_urls, tags, featured
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.category)
        .bind(&update.thumbnail_url)
        .bind(&update.media_urls)
        .bind(&update.tags)
        .bind(update.featured)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert(&self, new: NewContactMessage) -> Result<ContactMessage, StoreError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, project_type, message, created_at)
            VALUES ($1, $2, $3, $4, now())
            RETURNING id, name, email, project_type, message, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.project_type)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT id, name, email, project_type, message, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
