use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{bson::doc, error::ErrorKind, options::ClientOptions, Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::QuestionRecord,
};

/// Whole-collection persistence for the question bank.
///
/// There are no partial updates: `save_all` replaces everything previously
/// stored and `load_all` returns the last full write.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn load_all(&self) -> AppResult<Vec<QuestionRecord>>;
    async fn save_all(&self, records: &[QuestionRecord]) -> AppResult<()>;
    async fn health_check(&self) -> AppResult<()>;
}

/// Stores the bank as a JSON array in a single file.
pub struct JsonFileQuestionRepository {
    path: PathBuf,
}

impl JsonFileQuestionRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "questions.json".into());
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }
}

#[async_trait]
impl QuestionRepository for JsonFileQuestionRepository {
    async fn load_all(&self) -> AppResult<Vec<QuestionRecord>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No question bank at {}, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let parsed = serde_json::from_slice::<Vec<QuestionRecord>>(&contents)
            .map_err(|e| e.to_string())
            .and_then(checked);

        match parsed {
            Ok(records) => {
                log::info!(
                    "Loaded {} questions from {}",
                    records.len(),
                    self.path.display()
                );
                Ok(records)
            }
            Err(reason) => {
                log::warn!(
                    "Question bank at {} is malformed ({}), starting empty",
                    self.path.display(),
                    reason
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save_all(&self, records: &[QuestionRecord]) -> AppResult<()> {
        if let Some(parent) = self.parent_dir() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(records)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, body).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        log::info!(
            "Saved {} questions to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let Some(parent) = self.parent_dir() else {
            return Ok(());
        };
        if tokio::fs::try_exists(parent).await? {
            Ok(())
        } else {
            Err(AppError::StorageError(format!(
                "Directory {} does not exist",
                parent.display()
            )))
        }
    }
}

/// Passes the records through only when every one of them holds its invariants.
fn checked(records: Vec<QuestionRecord>) -> Result<Vec<QuestionRecord>, String> {
    for (index, record) in records.iter().enumerate() {
        record
            .check()
            .map_err(|reason| format!("record {}: {}", index, reason))?;
    }
    Ok(records)
}

const SNAPSHOT_ID: &str = "question_bank";

/// The whole bank kept as one document so every save is a single atomic replace.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionBankSnapshot {
    #[serde(rename = "_id")]
    pub id: String,
    pub records: Vec<QuestionRecord>,
    pub saved_at: DateTime<Utc>,
}

/// Keeps the bank in one snapshot document of `QUESTIONS_COLLECTION`.
pub struct MongoQuestionRepository {
    database: Database,
    collection: Collection<QuestionBankSnapshot>,
}

impl MongoQuestionRepository {
    /// Opens a client for `MONGO_CONN_STRING` and fails fast when the server does not answer.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::with_options(client_options(config).await?)?;
        let database = client.database(&config.mongo_db_name);
        let repository = Self {
            collection: database.collection(&config.questions_collection),
            database,
        };
        repository.health_check().await?;

        log::info!(
            "Using question bank collection {}.{}",
            config.mongo_db_name,
            config.questions_collection
        );
        Ok(repository)
    }
}

async fn client_options(config: &Config) -> AppResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.server_selection_timeout = Some(Duration::from_secs(5));
    Ok(options)
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn load_all(&self) -> AppResult<Vec<QuestionRecord>> {
        match self.collection.find_one(doc! { "_id": SNAPSHOT_ID }).await {
            Ok(Some(snapshot)) => match checked(snapshot.records) {
                Ok(records) => {
                    log::info!(
                        "Loaded {} questions from snapshot saved at {}",
                        records.len(),
                        snapshot.saved_at
                    );
                    Ok(records)
                }
                Err(reason) => {
                    log::warn!("Question bank snapshot is malformed ({}), starting empty", reason);
                    Ok(Vec::new())
                }
            },
            Ok(None) => {
                log::info!("No question bank snapshot found, starting empty");
                Ok(Vec::new())
            }
            Err(err) if matches!(*err.kind, ErrorKind::BsonDeserialization(_)) => {
                log::warn!("Question bank snapshot is malformed ({}), starting empty", err);
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save_all(&self, records: &[QuestionRecord]) -> AppResult<()> {
        let snapshot = QuestionBankSnapshot {
            id: SNAPSHOT_ID.to_string(),
            records: records.to_vec(),
            saved_at: Utc::now(),
        };

        self.collection
            .replace_one(doc! { "_id": SNAPSHOT_ID }, &snapshot)
            .upsert(true)
            .await?;

        log::info!("Saved {} questions to question bank snapshot", records.len());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::sample_record;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository = JsonFileQuestionRepository::new(dir.path().join("absent.json"));

        let records = repository.load_all().await.expect("load should succeed");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("questions.json");
        std::fs::write(&path, "{ not json").expect("write garbage");

        let repository = JsonFileQuestionRepository::new(&path);
        let records = repository.load_all().await.expect("load should succeed");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn non_utf8_file_loads_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("questions.json");
        std::fs::write(&path, [0xff, 0xfe, b'[', b']']).expect("write bytes");

        let repository = JsonFileQuestionRepository::new(&path);
        let records = repository.load_all().await.expect("load should succeed");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn file_with_invalid_record_loads_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("questions.json");
        let mut bad = sample_record("What is osmosis?", 0.0);
        bad.duplicate_risk = 7.5;
        let body = serde_json::to_vec(&vec![sample_record("Define diffusion.", 0.0), bad])
            .expect("serialize");
        std::fs::write(&path, body).expect("write bank");

        let repository = JsonFileQuestionRepository::new(&path);
        let records = repository.load_all().await.expect("load should succeed");
        assert!(records.is_empty());
    }

    #[test]
    fn checked_names_the_offending_record() {
        let mut blank = sample_record("placeholder", 0.0);
        blank.text = "  ".to_string();
        let err = checked(vec![sample_record("What is osmosis?", 0.2), blank])
            .expect_err("blank text is rejected");
        assert!(err.starts_with("record 1:"), "{}", err);
    }

    #[tokio::test]
    async fn client_options_carry_app_name_and_timeout() {
        let options = client_options(&Config::test_config())
            .await
            .expect("local connection string parses");
        assert_eq!(options.app_name.as_deref(), Some("question-bank-server"));
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn save_then_load_returns_last_full_write() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository = JsonFileQuestionRepository::new(dir.path().join("nested/questions.json"));

        let first = vec![sample_record("What is osmosis?", 0.0)];
        repository.save_all(&first).await.expect("first save");

        let second = vec![
            sample_record("Define diffusion.", 0.0),
            sample_record("Explain active transport.", 0.2),
        ];
        repository.save_all(&second).await.expect("second save");

        let loaded = repository.load_all().await.expect("load");
        assert_eq!(loaded, second);
        assert!(!repository.temp_path().exists());
    }

    #[tokio::test]
    async fn health_check_reports_missing_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ok = JsonFileQuestionRepository::new(dir.path().join("questions.json"));
        assert!(ok.health_check().await.is_ok());

        let missing = JsonFileQuestionRepository::new(dir.path().join("gone/questions.json"));
        assert!(missing.health_check().await.is_err());
    }

    #[test]
    fn snapshot_uses_fixed_document_id() {
        let snapshot = QuestionBankSnapshot {
            id: SNAPSHOT_ID.to_string(),
            records: vec![sample_record("What is osmosis?", 0.0)],
            saved_at: Utc::now(),
        };
        let value = serde_json::to_value(&snapshot).expect("snapshot serializes");
        assert_eq!(value["_id"], "question_bank");
        assert_eq!(value["records"][0]["text"], "What is osmosis?");
    }
}
