use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::question_record::{BloomLevel, Difficulty};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum Relevance {
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum Clarity {
    #[serde(alias = "clear")]
    Clear,
    #[serde(
        alias = "Needs Improvement",
        alias = "needs improvement",
        alias = "needs_improvement"
    )]
    NeedsImprovement,
}

/// Structured answer of the quality auditor for one question.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditVerdict {
    pub relevance: Relevance,
    pub bloom_level: BloomLevel,
    pub clarity: Clarity,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub suggested_improvement: Option<String>,
}

impl AuditVerdict {
    /// Low relevance or unclear wording sends the question to the rewriter.
    pub fn needs_repair(&self) -> bool {
        self.clarity == Clarity::NeedsImprovement || self.relevance == Relevance::Low
    }

    pub fn schema_json() -> String {
        let schema = schemars::schema_for!(AuditVerdict);
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parses the first JSON object found in a model reply, tolerating code fences
    /// and leading or trailing chatter.
    pub fn parse(reply: &str) -> Result<Self, serde_json::Error> {
        let body = match (reply.find('{'), reply.rfind('}')) {
            (Some(start), Some(end)) if start < end => &reply[start..=end],
            _ => reply.trim(),
        };
        serde_json::from_str(body)
    }
}

impl fmt::Display for AuditVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clarity = match self.clarity {
            Clarity::Clear => "Clear",
            Clarity::NeedsImprovement => "Needs Improvement",
        };
        writeln!(f, "Relevance: {:?}", self.relevance)?;
        writeln!(f, "Bloom Level: {}", self.bloom_level)?;
        writeln!(f, "Clarity: {}", clarity)?;
        writeln!(f, "Difficulty: {}", self.difficulty)?;
        match self
            .suggested_improvement
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(suggestion) => write!(f, "Suggested Improvement: {}", suggestion),
            None => write!(f, "Suggested Improvement: None"),
        }
    }
}
