use actix_web::{get, post, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::request::SubmitRatingRequest};

#[post("/api/ratings")]
pub async fn submit_rating(
    state: web::Data<AppState>,
    request: web::Json<SubmitRatingRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.rating_service.submit(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/ratings/summary")]
pub async fn rating_summary(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let summary = state.rating_service.summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}
