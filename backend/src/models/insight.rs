use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tripcompass_shared::{
    CreateInsightRequest, InsightQuery, InsightResponse, InsightType, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct Insight {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub insight_type: InsightType,
    pub category: String,
    pub relevant_states: Vec<String>,
    pub relevant_cities: Vec<String>,
    pub is_global: bool,
    pub tags: Vec<String>,
    pub views: i32,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const INSIGHT_COLUMNS: &str = "id, author_id, title, content, summary, insight_type, category, \
     relevant_states, relevant_cities, is_global, tags, views, likes, created_at, updated_at";

impl Insight {
    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        request: &CreateInsightRequest,
    ) -> Result<Self, AppError> {
        let query = format!(
            "INSERT INTO insights (author_id, title, content, summary, insight_type, category,
                 relevant_states, relevant_cities, is_global, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {INSIGHT_COLUMNS}"
        );

        sqlx::query_as::<_, Insight>(&query)
            .bind(author_id)
            .bind(&request.title)
            .bind(&request.content)
            .bind(&request.summary)
            .bind(request.insight_type)
            .bind(&request.category)
            .bind(&request.relevant_states)
            .bind(&request.relevant_cities)
            .bind(request.is_global)
            .bind(&request.tags)
            .fetch_one(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn search(pool: &PgPool, params: &InsightQuery) -> Result<Vec<Self>, AppError> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let mut clauses: Vec<String> = Vec::new();
        let mut param = 1;

        if params.insight_type.is_some() {
            clauses.push(format!("insight_type = ${param}"));
            param += 1;
        }
        if params.search.is_some() {
            clauses.push(format!(
                "(title ILIKE ${param} OR content ILIKE ${param} OR summary ILIKE ${param})"
            ));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let query = format!(
            "SELECT {INSIGHT_COLUMNS} FROM insights {where_clause}
             ORDER BY created_at DESC LIMIT {} OFFSET {}",
            limit, offset
        );

        let mut fetch = sqlx::query_as::<_, Insight>(&query);
        if let Some(insight_type) = params.insight_type {
            fetch = fetch.bind(insight_type);
        }
        if let Some(search) = &params.search {
            fetch = fetch.bind(format!("%{}%", search));
        }

        fetch.fetch_all(pool).await.map_err(AppError::from)
    }

    pub async fn find_and_count_view(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let query = format!(
            "UPDATE insights SET views = views + 1 WHERE id = $1
             RETURNING {INSIGHT_COLUMNS}"
        );
        sqlx::query_as::<_, Insight>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn like(pool: &PgPool, id: Uuid) -> Result<i32, AppError> {
        let likes: Option<(i32,)> = sqlx::query_as(
            "UPDATE insights SET likes = likes + 1 WHERE id = $1 RETURNING likes",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        likes
            .map(|(count,)| count)
            .ok_or_else(|| AppError::NotFound("Insight not found".to_string()))
    }

    pub fn to_response(&self) -> InsightResponse {
        InsightResponse {
            id: self.id,
            author_id: self.author_id,
            title: self.title.clone(),
            content: self.content.clone(),
            summary: self.summary.clone(),
            insight_type: self.insight_type,
            category: self.category.clone(),
            relevant_states: self.relevant_states.clone(),
            relevant_cities: self.relevant_cities.clone(),
            is_global: self.is_global,
            tags: self.tags.clone(),
            views: self.views,
            likes: self.likes,
            created_at: self.created_at,
        }
    }
}
