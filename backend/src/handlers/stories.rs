use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::database::Database;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{City, Story, User};
use tripcompass_shared::{CreateStoryRequest, StoryQuery};

pub async fn list_stories(
    db: web::Data<Database>,
    query: web::Query<StoryQuery>,
) -> Result<HttpResponse, AppError> {
    let stories = Story::search(db.pool(), &query).await?;
    let responses: Vec<_> = stories.iter().map(|s| s.to_response(None)).collect();
    Ok(HttpResponse::Ok().json(responses))
}

pub async fn create_story(
    db: web::Data<Database>,
    user: AuthenticatedUser,
    request: web::Json<CreateStoryRequest>,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if City::find_by_id(db.pool(), request.city_id).await?.is_none() {
        return Err(AppError::NotFound("City not found".to_string()));
    }

    let story = Story::create(db.pool(), user.user_id, &request).await?;
    Ok(HttpResponse::Created().json(story.to_response(Some(user.username))))
}

/// Story detail; each read counts as a view.
pub async fn get_story(
    db: web::Data<Database>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let story = Story::find_and_count_view(db.pool(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Story not found".to_string()))?;

    let author = User::find_by_id(db.pool(), story.user_id)
        .await?
        .map(|u| u.username);
    let city = City::find_by_id(db.pool(), story.city_id)
        .await?
        .map(|c| c.to_response());

    let mut response = story.to_response(author);
    response.city = city;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn like_story(
    db: web::Data<Database>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let likes = Story::like(db.pool(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "likes": likes })))
}
