pub mod citation;
pub mod coherence;
pub mod grammar;
pub mod plagiarism;
pub mod readability;
pub mod scoring;
pub mod style;
pub mod suggestions;

pub use citation::{CitationAnalysis, CitationAnalyzer};
pub use coherence::{CoherenceAnalysis, CoherenceAnalyzer};
pub use grammar::{GrammarAnalysis, GrammarAnalyzer};
pub use plagiarism::{PlagiarismDetector, StubPlagiarismDetector, ORIGINALITY_THRESHOLD};
pub use scoring::{aggregate, overall_score, ScoreCategory};
pub use style::{StyleAnalysis, StyleAnalyzer, StyleMetrics};
pub use suggestions::{Suggestion, SuggestionService};
