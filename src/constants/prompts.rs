//! Prompt templates sent to the text-generation service.
//!
//! Placeholders are written as `{name}` and filled by the question pipeline.

pub const QUESTION_PLAN_PROMPT: &str = "You are an Assessment Design Expert.
Create a QUESTION PLAN before generating questions.

Inputs:
Syllabus: {syllabus}
Course Outcomes: {course_outcomes}

Requirements:
Total Questions: {question_count}
Target Bloom Level: {bloom_level}
Difficulty: {difficulty}
Marks per Question: {marks}

Output the plan in clear bullet points including:

1. Intended Question Coverage Strategy
2. Bloom Level Mix Justification
3. Difficulty Spread Strategy
4. CO Mapping Strategy
5. Risk Controls for Duplicates & Relevance";

pub const QUESTION_DRAFT_PROMPT: &str = "Generate {question_count} exam questions for the syllabus below.

Syllabus:
{syllabus}

Course Outcomes:
{course_outcomes}

Bloom Level Target: {bloom_level}
Difficulty: {difficulty}
Marks: {marks}

Return questions in numbered list, one question per line, with no other text.";

pub const BLOOM_CLASSIFIER_PROMPT: &str = "Classify the Bloom level for this question only as one word:
Remember, Understand, Apply, Analyze, Evaluate, Create

Question:
{question}";

pub const QUESTION_AUDIT_PROMPT: &str = "You are an Assessment Quality Auditor.

Evaluate the following exam question:

Question:
{question}

Context:
Syllabus: {syllabus}
Course Outcomes: {course_outcomes}

Judge:
- relevance to the syllabus and course outcomes (High, Medium or Low)
- the Bloom level of the question (one word)
- clarity of the wording (Clear or NeedsImprovement)
- difficulty (Easy, Medium or Hard)
- a short suggested improvement, or null when none is needed

Respond with ONLY a JSON object that validates against this JSON schema.
No prose, no markdown, no extra keys.

{schema}";

pub const QUESTION_REPAIR_PROMPT: &str = "You are an AI Assessment Improver.

Original Question:
{question}

Audit Feedback:
{audit_feedback}

Syllabus:
{syllabus}

Course Outcomes:
{course_outcomes}

TASK:
Rewrite the question to FIX all weaknesses
while keeping meaning and marks level SAME.

Return ONLY the improved question.";

/// Substitutes every `{key}` in `template` with its value.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |prompt, (key, value)| {
            prompt.replace(&format!("{{{}}}", key), value)
        })
}
