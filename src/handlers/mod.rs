pub mod graphql_handler;
pub mod health_handler;
pub mod question_handler;
pub mod rating_handler;

use actix_web::web;

/// Registers every HTTP route. Callers provide `web::Data<AppState>` and `web::Data<Schema>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_handler::health_check)
        .service(health_handler::health_check_live)
        .service(health_handler::health_check_ready)
        .service(question_handler::generate_questions)
        .service(question_handler::list_questions)
        .service(question_handler::audit_summary)
        .service(question_handler::export_csv)
        .service(question_handler::score_duplicate)
        .service(rating_handler::submit_rating)
        .service(rating_handler::rating_summary)
        .service(graphql_handler::graphql)
        .service(graphql_handler::graphiql);
}
