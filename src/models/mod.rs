pub mod document;
pub mod review;
pub mod user;

pub use document::{CitationStyle, Document, DocumentStatus, Language, ProcessingMetadata};
pub use review::{
    AiAnalysis, Feedback, Issue, IssueType, PlagiarismCheck, PlagiarismSource, Position, Review,
    ReviewStatus, ReviewSummary, Scores, Severity,
};
pub use user::{User, UserStatistics};
