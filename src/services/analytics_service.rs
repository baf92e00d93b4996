use crate::models::{
    domain::{BloomLevel, Difficulty, QuestionRecord},
    dto::response::{AuditSummary, CountEntry},
};

pub struct AnalyticsService;

impl AnalyticsService {
    /// Summarise the bank for the audit dashboard.
    pub fn summarize(records: &[QuestionRecord]) -> AuditSummary {
        let total = records.len();
        let duplicate_alerts = records.iter().filter(|r| r.is_possible_duplicate()).count();
        let duplicate_risks: Vec<f64> = records.iter().map(|r| r.duplicate_risk).collect();

        let average_duplicate_risk = if total == 0 {
            0.0
        } else {
            round_to_hundredths(duplicate_risks.iter().sum::<f64>() / total as f64)
        };

        let bloom_distribution = BloomLevel::ALL
            .iter()
            .map(|level| CountEntry {
                label: level.to_string(),
                count: records.iter().filter(|r| r.bloom_level == *level).count() as i32,
            })
            .collect();

        let difficulty_distribution = Difficulty::ALL
            .iter()
            .map(|difficulty| CountEntry {
                label: difficulty.to_string(),
                count: records.iter().filter(|r| r.difficulty == *difficulty).count() as i32,
            })
            .collect();

        AuditSummary {
            total_questions: total as i32,
            duplicate_alerts: duplicate_alerts as i32,
            average_duplicate_risk,
            bloom_distribution,
            difficulty_distribution,
            duplicate_risks,
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
