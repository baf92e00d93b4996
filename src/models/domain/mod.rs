pub mod audit_verdict;
pub mod question_batch;
pub mod question_record;
pub mod rating;
pub use audit_verdict::AuditVerdict;
pub use question_batch::QuestionBatchParams;
pub use question_record::{
    BloomLevel, Difficulty, DuplicateFlag, Marks, QuestionRecord, QuestionStatus,
};
pub use rating::RatingRecord;
