//! 文体分析 - 业务能力层
//!
//! 只负责"文体衡量"能力：句长、复杂词比例、可读性。
//! 本地计算，无外部依赖。

use tracing::debug;

use crate::models::{Issue, IssueType, Language, Position, Severity};
use crate::services::readability;
use crate::utils::text;

/// 平均句长超过该词数时提示拆分长句
const MAX_AVG_SENTENCE_LENGTH: f64 = 25.0;
/// 长词（> 6 字符）比例超过该值时提示简化用词
const MAX_COMPLEX_WORD_RATIO: f64 = 0.3;

/// 文体指标
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleMetrics {
    pub avg_sentence_length: f64,
    pub complex_word_ratio: f64,
    pub readability: f64,
}

/// 文体分析结果
#[derive(Debug, Clone, Default)]
pub struct StyleAnalysis {
    pub score: u8,
    pub issues: Vec<Issue>,
    pub metrics: StyleMetrics,
}

/// 文体分析器
#[derive(Debug, Default)]
pub struct StyleAnalyzer;

impl StyleAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 分析文本的文体质量
    pub fn analyze(&self, input: &str, language: Language) -> StyleAnalysis {
        let words = text::tokenize_words(input);
        let sentences = text::split_sentences(input);
        let total_chars = text::char_len(input);

        let readability = readability::readability_score(input, language);

        let metrics = if words.is_empty() || sentences.is_empty() {
            StyleMetrics {
                readability,
                ..StyleMetrics::default()
            }
        } else {
            let complex_words = words.iter().filter(|w| w.chars().count() > 6).count();
            StyleMetrics {
                avg_sentence_length: words.len() as f64 / sentences.len() as f64,
                complex_word_ratio: complex_words as f64 / words.len() as f64,
                readability,
            }
        };

        let mut issues = Vec::new();

        if metrics.avg_sentence_length > MAX_AVG_SENTENCE_LENGTH {
            issues.push(Issue {
                issue_type: IssueType::Style,
                severity: Severity::Medium,
                position: Position {
                    start: 0,
                    end: total_chars,
                },
                original_text: "Texto completo".to_string(),
                suggestion: "Considera dividir oraciones largas para mejorar la legibilidad"
                    .to_string(),
                explanation: "Las oraciones muy largas pueden dificultar la comprensión".to_string(),
                confidence: 0.8,
                is_resolved: false,
            });
        }

        if metrics.complex_word_ratio > MAX_COMPLEX_WORD_RATIO {
            issues.push(Issue {
                issue_type: IssueType::Style,
                severity: Severity::Low,
                position: Position {
                    start: 0,
                    end: total_chars,
                },
                original_text: "Vocabulario".to_string(),
                suggestion: "Considera usar palabras más simples cuando sea apropiado".to_string(),
                explanation: "Un vocabulario muy complejo puede afectar la claridad".to_string(),
                confidence: 0.7,
                is_resolved: false,
            });
        }

        let score = (readability + 20.0).min(100.0).round() as u8;

        debug!(
            "文体分析完成: 句长 {:.1} | 复杂词比例 {:.2} | 可读性 {:.1} | 得分 {}",
            metrics.avg_sentence_length, metrics.complex_word_ratio, metrics.readability, score
        );

        StyleAnalysis {
            score,
            issues,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_text_has_no_issues() {
        let analyzer = StyleAnalyzer::new();
        let result = analyzer.analyze("El sol sale. La luna baja. Todo pasa.", Language::Es);
        assert!(result.issues.is_empty());
        assert!(result.score >= 20);
    }

    #[test]
    fn test_long_sentences_flagged() {
        let analyzer = StyleAnalyzer::new();
        // 一句 30 个词，远超 25 词的阈值
        let long = format!("{}.", "palabra ".repeat(30).trim_end());
        let result = analyzer.analyze(&long, Language::Es);

        assert!(result.metrics.avg_sentence_length > 25.0);
        assert!(result
            .issues
            .iter()
            .any(|i| i.issue_type == IssueType::Style && i.severity == Severity::Medium));
    }

    #[test]
    fn test_complex_vocabulary_flagged() {
        let analyzer = StyleAnalyzer::new();
        let dense = "Paralelamente, administrativamente, fundamentalmente. Extraordinariamente complicado.";
        let result = analyzer.analyze(dense, Language::Es);

        assert!(result.metrics.complex_word_ratio > 0.3);
        assert!(result
            .issues
            .iter()
            .any(|i| i.severity == Severity::Low));
    }

    #[test]
    fn test_score_capped_at_100() {
        let analyzer = StyleAnalyzer::new();
        let result = analyzer.analyze("Va. Ve. Vi.", Language::Es);
        assert!(result.score <= 100);
    }

    #[test]
    fn test_empty_text() {
        let analyzer = StyleAnalyzer::new();
        let result = analyzer.analyze("", Language::Es);
        assert_eq!(result.score, 20);
        assert!(result.issues.is_empty());
    }
}
