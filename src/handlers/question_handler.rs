use actix_web::{get, http::header, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{GenerateQuestionsRequest, ScoreDuplicateRequest},
        response::{GeneratedBatchResponse, QuestionDto},
    },
    services::export_service::ExportService,
};

#[post("/api/questions/generate")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let batch = state
        .question_service
        .generate_batch(request.into_inner())
        .await?;

    let response = GeneratedBatchResponse {
        plan: batch.plan,
        questions: batch.questions.into_iter().map(QuestionDto::from).collect(),
    };
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/questions")]
pub async fn list_questions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let questions: Vec<QuestionDto> = state
        .question_service
        .list_questions()
        .await
        .into_iter()
        .map(QuestionDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(questions))
}

#[get("/api/questions/summary")]
pub async fn audit_summary(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let summary = state.question_service.audit_summary().await;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/api/questions/export.csv")]
pub async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let csv = state.question_service.export_csv().await;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        ExportService::csv_file_name()
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .body(csv))
}

#[post("/api/duplicates/score")]
pub async fn score_duplicate(
    state: web::Data<AppState>,
    request: web::Json<ScoreDuplicateRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .question_service
        .score_duplicate(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
