use crate::models::domain::QuestionRecord;

pub const CSV_HEADER: [&str; 8] = [
    "text",
    "bloomLevel",
    "difficulty",
    "marks",
    "duplicateRisk",
    "flag",
    "auditFeedback",
    "status",
];

pub struct ExportService;

impl ExportService {
    /// Renders the bank as CSV, one row per record in insertion order.
    pub fn to_csv(records: &[QuestionRecord]) -> String {
        let mut out = String::new();
        push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

        for record in records {
            push_row(
                &mut out,
                [
                    record.text.clone(),
                    record.bloom_level.to_string(),
                    record.difficulty.to_string(),
                    record.marks.to_string(),
                    record.duplicate_risk.to_string(),
                    record.flag.to_string(),
                    record.audit_feedback.clone(),
                    record.status.to_string(),
                ],
            );
        }
        out
    }

    pub fn csv_file_name() -> String {
        format!(
            "question_bank_{}.csv",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        )
    }
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let row: Vec<String> = fields.into_iter().map(|f| escape_field(&f)).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

// RFC 4180: quote when the field holds a separator, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
