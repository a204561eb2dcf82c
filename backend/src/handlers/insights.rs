use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::database::Database;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::Insight;
use tripcompass_shared::{CreateInsightRequest, InsightQuery};

pub async fn list_insights(
    db: web::Data<Database>,
    query: web::Query<InsightQuery>,
) -> Result<HttpResponse, AppError> {
    let insights = Insight::search(db.pool(), &query).await?;
    let responses: Vec<_> = insights.iter().map(Insight::to_response).collect();
    Ok(HttpResponse::Ok().json(responses))
}

pub async fn create_insight(
    db: web::Data<Database>,
    user: AuthenticatedUser,
    request: web::Json<CreateInsightRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let insight = Insight::create(db.pool(), user.user_id, &request).await?;
    Ok(HttpResponse::Created().json(insight.to_response()))
}

/// Insight detail; each read counts as a view.
pub async fn get_insight(
    db: web::Data<Database>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let insight = Insight::find_and_count_view(db.pool(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Insight not found".to_string()))?;
    Ok(HttpResponse::Ok().json(insight.to_response()))
}

pub async fn like_insight(
    db: web::Data<Database>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let likes = Insight::like(db.pool(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "likes": likes })))
}
