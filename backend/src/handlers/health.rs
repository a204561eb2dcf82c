use actix_web::{get, HttpResponse};

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tripcompass-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
