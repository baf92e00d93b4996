use std::env;
use std::path::PathBuf;

use secrecy::SecretString;

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.80;
pub const DEFAULT_LLM_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_FAST_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_SMART_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Mongo,
}

impl StorageBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => StorageBackend::Mongo,
            _ => StorageBackend::File,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub storage_backend: StorageBackend,
    pub questions_file: PathBuf,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub questions_collection: String,
    pub llm_api_base: String,
    pub llm_api_key: SecretString,
    pub llm_fast_model: String,
    pub llm_smart_model: String,
    pub duplicate_threshold: f64,
    pub tfidf_smooth_idf: bool,
    pub tfidf_sublinear_tf: bool,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|o| !o.trim().is_empty()),
            storage_backend: env::var("STORAGE_BACKEND")
                .map(|v| StorageBackend::parse(&v))
                .unwrap_or(StorageBackend::File),
            questions_file: env::var("QUESTIONS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("questions.json")),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "question-bank-local".to_string()),
            questions_collection: env::var("QUESTIONS_COLLECTION")
                .unwrap_or_else(|_| "question_bank".to_string()),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_LLM_API_BASE.to_string()),
            llm_api_key: SecretString::from(
                env::var("LLM_API_KEY")
                    .or_else(|_| env::var("GROQ_API_KEY"))
                    .unwrap_or_default(),
            ),
            llm_fast_model: env::var("LLM_FAST_MODEL")
                .unwrap_or_else(|_| DEFAULT_FAST_MODEL.to_string()),
            llm_smart_model: env::var("LLM_SMART_MODEL")
                .unwrap_or_else(|_| DEFAULT_SMART_MODEL.to_string()),
            duplicate_threshold: env::var("DUPLICATE_THRESHOLD")
                .ok()
                .and_then(|t| t.parse::<f64>().ok())
                .filter(|t| (0.0..=1.0).contains(t))
                .unwrap_or(DEFAULT_DUPLICATE_THRESHOLD),
            tfidf_smooth_idf: env_flag("TFIDF_SMOOTH_IDF", true),
            tfidf_sublinear_tf: env_flag("TFIDF_SUBLINEAR_TF", false),
        }
    }

    /// Logs a warning for settings that leave the server unable to reach the model.
    pub fn warn_on_missing_secrets(&self) {
        use secrecy::ExposeSecret;

        if self.llm_api_key.expose_secret().trim().is_empty() {
            log::warn!(
                "LLM_API_KEY (or GROQ_API_KEY) is not set; question generation requests will fail"
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: None,
            storage_backend: StorageBackend::File,
            questions_file: PathBuf::from("questions-test.json"),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "question-bank-test".to_string(),
            questions_collection: "question_bank".to_string(),
            llm_api_base: DEFAULT_LLM_API_BASE.to_string(),
            llm_api_key: SecretString::from("test_llm_key".to_string()),
            llm_fast_model: DEFAULT_FAST_MODEL.to_string(),
            llm_smart_model: DEFAULT_SMART_MODEL.to_string(),
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            tfidf_smooth_idf: true,
            tfidf_sublinear_tf: false,
        }
    }
}
