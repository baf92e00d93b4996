pub mod analytics_service;
pub mod duplicate_detector;
pub mod export_service;
pub mod model_service;
pub mod question_service;
pub mod rating_service;
