//! 引用分析 - 业务能力层
//!
//! 本地启发式：按引用格式的正则模式统计候选引用，
//! 再按关键词检查参考文献小节。

use anyhow::Result;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::{CitationStyle, Issue, IssueType, Position, Severity};
use crate::utils::text;

/// 基础得分
const BASE_SCORE: i32 = 90;
/// 长文本完全无引用的扣分
const NO_CITATIONS_PENALTY: i32 = 30;
/// 有引用但缺少参考文献小节的扣分
const NO_BIBLIOGRAPHY_PENALTY: i32 = 20;
/// 超过该字符数的文本才要求引用
const CITATION_REQUIRED_LENGTH: usize = 1000;

/// 引用分析结果
#[derive(Debug, Clone, Default)]
pub struct CitationAnalysis {
    pub score: u8,
    pub issues: Vec<Issue>,
    pub citation_count: usize,
    pub has_bibliography: bool,
}

impl CitationAnalysis {
    /// 阶段失败时的兜底结果
    fn fallback() -> Self {
        Self {
            score: 75,
            ..Self::default()
        }
    }
}

/// 引用分析器
#[derive(Debug, Default)]
pub struct CitationAnalyzer;

impl CitationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 分析引用格式与完整性
    ///
    /// 内部失败不外抛：记录日志并返回兜底结果。
    pub fn analyze(&self, input: &str, style: CitationStyle) -> CitationAnalysis {
        match self.try_analyze(input, style) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("引用分析失败，使用兜底结果: {}", e);
                CitationAnalysis::fallback()
            }
        }
    }

    fn try_analyze(&self, input: &str, style: CitationStyle) -> Result<CitationAnalysis> {
        let pattern = match style {
            CitationStyle::Apa => r"[A-Za-z]+,?\s+\d{4}",
            CitationStyle::Ieee => r"\[\d+\]",
            CitationStyle::Mla => r"[A-Za-z]+\s+\d+",
            CitationStyle::Chicago => r"[A-Za-z]+\s+\d{4},?\s+\d+",
        };

        let citation_re = Regex::new(pattern)?;
        let citation_count = citation_re.find_iter(input).count();

        let bibliography_re = Regex::new(r"(?i)referencias|bibliografía|bibliography|works cited")?;
        let has_bibliography = bibliography_re.is_match(input);

        let total_chars = text::char_len(input);
        let mut score = BASE_SCORE;
        let mut issues = Vec::new();

        if citation_count == 0 && total_chars > CITATION_REQUIRED_LENGTH {
            issues.push(Issue {
                issue_type: IssueType::Citation,
                severity: Severity::High,
                position: Position {
                    start: 0,
                    end: total_chars,
                },
                original_text: "Documento completo".to_string(),
                suggestion: format!("Agrega citas en formato {}", style.name()),
                explanation: "Los trabajos académicos requieren citas apropiadas".to_string(),
                confidence: 0.9,
                is_resolved: false,
            });
            score -= NO_CITATIONS_PENALTY;
        }

        if !has_bibliography && citation_count > 0 {
            issues.push(Issue {
                issue_type: IssueType::Citation,
                severity: Severity::Medium,
                position: Position {
                    start: total_chars.saturating_sub(100),
                    end: total_chars,
                },
                original_text: "Final del documento".to_string(),
                suggestion: "Agrega una sección de referencias o bibliografía".to_string(),
                explanation: "Las citas requieren una lista de referencias completa".to_string(),
                confidence: 0.85,
                is_resolved: false,
            });
            score -= NO_BIBLIOGRAPHY_PENALTY;
        }

        debug!(
            "引用分析完成: {} 个引用 | 参考文献: {} | 得分 {}",
            citation_count, has_bibliography, score
        );

        Ok(CitationAnalysis {
            score: score.clamp(0, 100) as u8,
            issues,
            citation_count,
            has_bibliography,
        })
    }
}
