use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::{Mutex, RwLock};
use validator::Validate;

use crate::{
    constants::prompts::{
        render, BLOOM_CLASSIFIER_PROMPT, QUESTION_AUDIT_PROMPT, QUESTION_DRAFT_PROMPT,
        QUESTION_PLAN_PROMPT, QUESTION_REPAIR_PROMPT,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{
            AuditVerdict, BloomLevel, QuestionBatchParams, QuestionRecord, QuestionStatus,
        },
        dto::{
            request::{GenerateQuestionsRequest, ScoreDuplicateRequest},
            response::{AuditSummary, DuplicateScoreResponse},
        },
    },
    repositories::QuestionRepository,
    services::{
        analytics_service::AnalyticsService,
        duplicate_detector::DuplicateDetector,
        export_service::ExportService,
        model_service::{ModelTier, TextGenerator},
    },
};

static NUMBERED_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?(?:q(?:uestion)?\s*)?\d{1,3}\s*[.):\-]\s*(?:\*\*)?\s*(.+)$")
        .expect("NUMBERED_LINE_REGEX is a valid regex pattern")
});

static BULLET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*•]\s+").expect("BULLET_REGEX is a valid regex pattern"));

/// Result of one successful generation batch.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    pub plan: String,
    pub questions: Vec<QuestionRecord>,
}

/// Owns the question bank and runs the generation pipeline.
///
/// The bank is append-only. Batches are serialised by `batch_lock`; a batch
/// is committed only after the repository accepted the full collection.
pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
    generator: Arc<dyn TextGenerator>,
    detector: DuplicateDetector,
    bank: RwLock<Vec<QuestionRecord>>,
    batch_lock: Mutex<()>,
}

impl QuestionService {
    /// Builds the service with the bank loaded from `repository`.
    pub async fn load(
        repository: Arc<dyn QuestionRepository>,
        generator: Arc<dyn TextGenerator>,
        detector: DuplicateDetector,
    ) -> AppResult<Self> {
        let mut records = repository.load_all().await?;
        for record in records.iter_mut() {
            record.rederive_flag(detector.threshold());
        }

        Ok(Self {
            repository,
            generator,
            detector,
            bank: RwLock::new(records),
            batch_lock: Mutex::new(()),
        })
    }

    pub fn detector(&self) -> &DuplicateDetector {
        &self.detector
    }

    pub async fn list_questions(&self) -> Vec<QuestionRecord> {
        self.bank.read().await.clone()
    }

    pub async fn question_count(&self) -> usize {
        self.bank.read().await.len()
    }

    pub async fn audit_summary(&self) -> AuditSummary {
        let bank = self.bank.read().await;
        AnalyticsService::summarize(&bank)
    }

    pub async fn export_csv(&self) -> String {
        let bank = self.bank.read().await;
        ExportService::to_csv(&bank)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }

    /// Scores a candidate against an explicit corpus, or the stored bank when none is given.
    pub async fn score_duplicate(
        &self,
        request: ScoreDuplicateRequest,
    ) -> AppResult<DuplicateScoreResponse> {
        request.validate()?;

        let assessment = match request.corpus {
            Some(corpus) => self.detector.assess(&request.candidate, &corpus),
            None => {
                let bank = self.bank.read().await;
                let texts: Vec<&str> = bank.iter().map(|r| r.text.as_str()).collect();
                self.detector.assess(&request.candidate, &texts)
            }
        };

        Ok(DuplicateScoreResponse {
            score: assessment.score,
            flag: assessment.flag,
            threshold: self.detector.threshold(),
        })
    }

    /// Runs plan, draft and the per-candidate score/classify/audit/repair loop,
    /// then appends the batch and saves the whole bank.
    ///
    /// Any model or storage failure aborts the batch with the bank untouched.
    pub async fn generate_batch(&self, request: GenerateQuestionsRequest) -> AppResult<GeneratedBatch> {
        let params = QuestionBatchParams::try_from(request)?;
        let _batch_guard = self.batch_lock.lock().await;

        log::info!(
            "Generating {} {} questions ({} marks, target {})",
            params.question_count,
            params.difficulty,
            params.marks,
            params.bloom_level
        );

        let plan = self
            .generator
            .generate(ModelTier::Smart, &render_batch_prompt(QUESTION_PLAN_PROMPT, &params))
            .await?;

        let draft = self
            .generator
            .generate(ModelTier::Fast, &render_batch_prompt(QUESTION_DRAFT_PROMPT, &params))
            .await?;
        let candidates = parse_candidates(&draft);
        if candidates.is_empty() {
            return Err(AppError::ModelError(
                "Model returned no questions".to_string(),
            ));
        }
        if candidates.len() != usize::from(params.question_count) {
            log::warn!(
                "Requested {} questions, model drafted {}",
                params.question_count,
                candidates.len()
            );
        }

        let mut corpus: Vec<String> = self
            .bank
            .read()
            .await
            .iter()
            .map(|r| r.text.clone())
            .collect();
        let mut batch = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let record = self.build_record(&candidate, &corpus, &params).await?;
            corpus.push(record.text.clone());
            batch.push(record);
        }

        let mut bank = self.bank.write().await;
        let mut updated = bank.clone();
        updated.extend(batch.iter().cloned());
        self.repository.save_all(&updated).await?;
        *bank = updated;

        log::info!(
            "Added {} questions to the bank ({} total)",
            batch.len(),
            bank.len()
        );

        Ok(GeneratedBatch {
            plan,
            questions: batch,
        })
    }

    async fn build_record(
        &self,
        candidate: &str,
        corpus: &[String],
        params: &QuestionBatchParams,
    ) -> AppResult<QuestionRecord> {
        let duplicate_risk = self.detector.score(candidate, corpus);
        let bloom_level = self.classify_bloom(candidate, params.bloom_level).await?;
        let verdict = self.audit(candidate, params).await?;
        let audit_feedback = verdict.to_string();

        let (text, status) = if verdict.needs_repair() {
            log::debug!("Audit flagged question for repair: {}", candidate);
            let repaired = self.repair(candidate, &audit_feedback, params).await?;
            (repaired, QuestionStatus::Improved)
        } else {
            (candidate.to_string(), QuestionStatus::Accepted)
        };

        Ok(QuestionRecord::new(
            text,
            bloom_level,
            params.difficulty,
            params.marks,
            duplicate_risk,
            self.detector.threshold(),
        )
        .with_audit(audit_feedback, status))
    }

    async fn classify_bloom(&self, question: &str, fallback: BloomLevel) -> AppResult<BloomLevel> {
        let prompt = render(BLOOM_CLASSIFIER_PROMPT, &[("question", question)]);
        let reply = self.generator.generate(ModelTier::Fast, &prompt).await?;

        Ok(BloomLevel::find_in(&reply).unwrap_or_else(|| {
            log::warn!(
                "Unrecognised Bloom level {:?}, using batch target {}",
                reply.trim(),
                fallback
            );
            fallback
        }))
    }

    async fn audit(&self, question: &str, params: &QuestionBatchParams) -> AppResult<AuditVerdict> {
        let schema = AuditVerdict::schema_json();
        let prompt = render(
            QUESTION_AUDIT_PROMPT,
            &[
                ("question", question),
                ("syllabus", &params.syllabus),
                ("course_outcomes", &params.course_outcomes),
                ("schema", &schema),
            ],
        );
        let reply = self.generator.generate(ModelTier::Smart, &prompt).await?;

        AuditVerdict::parse(&reply)
            .map_err(|e| AppError::ModelError(format!("Malformed audit verdict: {}", e)))
    }

    async fn repair(
        &self,
        question: &str,
        audit_feedback: &str,
        params: &QuestionBatchParams,
    ) -> AppResult<String> {
        let prompt = render(
            QUESTION_REPAIR_PROMPT,
            &[
                ("question", question),
                ("audit_feedback", audit_feedback),
                ("syllabus", &params.syllabus),
                ("course_outcomes", &params.course_outcomes),
            ],
        );
        let reply = self.generator.generate(ModelTier::Smart, &prompt).await?;

        let repaired = clean_line(reply.trim());
        if repaired.is_empty() {
            return Err(AppError::ModelError(
                "Model returned an empty rewrite".to_string(),
            ));
        }
        Ok(repaired)
    }
}

fn render_batch_prompt(template: &str, params: &QuestionBatchParams) -> String {
    let question_count = params.question_count.to_string();
    let marks = params.marks.to_string();
    render(
        template,
        &[
            ("syllabus", &params.syllabus),
            ("course_outcomes", &params.course_outcomes),
            ("question_count", &question_count),
            ("bloom_level", params.bloom_level.as_str()),
            ("difficulty", params.difficulty.as_str()),
            ("marks", &marks),
        ],
    )
}

/// Splits a drafted list into candidate questions.
///
/// When any line is list-numbered only numbered lines count, which drops
/// preambles such as "Here are five questions:".
pub fn parse_candidates(reply: &str) -> Vec<String> {
    let lines: Vec<&str> = reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let numbered: Vec<String> = lines
        .iter()
        .filter_map(|line| NUMBERED_LINE_REGEX.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|text| !text.is_empty())
        .collect();

    if !numbered.is_empty() {
        return numbered;
    }

    lines
        .into_iter()
        .map(clean_line)
        .filter(|text| !text.is_empty())
        .collect()
}

fn clean_line(line: &str) -> String {
    let line = line.trim();
    if let Some(caps) = NUMBERED_LINE_REGEX.captures(line) {
        if let Some(text) = caps.get(1) {
            return text.as_str().trim().to_string();
        }
    }
    BULLET_REGEX.replace(line, "").trim().to_string()
}
