use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tripcompass_shared::{CreateStoryRequest, StoryQuery, StoryResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct Story {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub city_id: Uuid,
    pub specific_place: Option<String>,
    pub place_type: Option<String>,
    pub journey_type: Option<String>,
    pub duration_days: Option<i32>,
    pub travel_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub likes: i32,
    pub views: i32,
    pub is_featured: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const STORY_COLUMNS: &str = "id, user_id, title, content, summary, city_id, specific_place, \
     place_type, journey_type, duration_days, travel_date, tags, likes, views, is_featured, \
     is_approved, created_at, updated_at";

impl Story {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        request: &CreateStoryRequest,
    ) -> Result<Self, AppError> {
        let query = format!(
            "INSERT INTO stories (user_id, title, content, summary, city_id, specific_place,
                 place_type, journey_type, duration_days, travel_date, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {STORY_COLUMNS}"
        );

        sqlx::query_as::<_, Story>(&query)
            .bind(user_id)
            .bind(&request.title)
            .bind(&request.content)
            .bind(&request.summary)
            .bind(request.city_id)
            .bind(&request.specific_place)
            .bind(&request.place_type)
            .bind(&request.journey_type)
            .bind(request.duration_days)
            .bind(request.travel_date)
            .bind(&request.tags)
            .fetch_one(pool)
            .await
            .map_err(AppError::from)
    }

    /// Approved stories only; drafts pending moderation stay hidden.
    pub async fn search(pool: &PgPool, params: &StoryQuery) -> Result<Vec<Self>, AppError> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let mut clauses = vec!["is_approved = TRUE".to_string()];
        let mut param = 1;

        if params.city.is_some() {
            clauses.push(format!("city_id = ${param}"));
            param += 1;
        }
        if params.featured.is_some() {
            clauses.push(format!("is_featured = ${param}"));
            param += 1;
        }
        if params.search.is_some() {
            clauses.push(format!(
                "(title ILIKE ${param} OR content ILIKE ${param} OR summary ILIKE ${param})"
            ));
        }

        let query = format!(
            "SELECT {STORY_COLUMNS} FROM stories WHERE {}
             ORDER BY created_at DESC LIMIT {} OFFSET {}",
            clauses.join(" AND "),
            limit,
            offset
        );

        let mut fetch = sqlx::query_as::<_, Story>(&query);
        if let Some(city) = params.city {
            fetch = fetch.bind(city);
        }
        if let Some(featured) = params.featured {
            fetch = fetch.bind(featured);
        }
        if let Some(search) = &params.search {
            fetch = fetch.bind(format!("%{}%", search));
        }

        fetch.fetch_all(pool).await.map_err(AppError::from)
    }

    /// Fetch a story and bump its view counter in one round trip.
    pub async fn find_and_count_view(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let query = format!(
            "UPDATE stories SET views = views + 1 WHERE id = $1 AND is_approved = TRUE
             RETURNING {STORY_COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn like(pool: &PgPool, id: Uuid) -> Result<i32, AppError> {
        let likes: Option<(i32,)> = sqlx::query_as(
            "UPDATE stories SET likes = likes + 1 WHERE id = $1 RETURNING likes",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        likes
            .map(|(count,)| count)
            .ok_or_else(|| AppError::NotFound("Story not found".to_string()))
    }

    pub fn to_response(&self, author: Option<String>) -> StoryResponse {
        StoryResponse {
            id: self.id,
            user_id: self.user_id,
            author,
            title: self.title.clone(),
            content: self.content.clone(),
            summary: self.summary.clone(),
            city: None,
            specific_place: self.specific_place.clone(),
            place_type: self.place_type.clone(),
            journey_type: self.journey_type.clone(),
            duration_days: self.duration_days,
            travel_date: self.travel_date,
            tags: self.tags.clone(),
            likes: self.likes,
            views: self.views,
            is_featured: self.is_featured,
            created_at: self.created_at,
        }
    }
}
