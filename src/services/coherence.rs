//! 连贯性分析 - 业务能力层
//!
//! 本地启发式：按空行切段，段落超过两个时检查是否出现
//! 过渡词，缺失则扣分并给出提示。

use phf::phf_set;
use tracing::debug;

use crate::models::{Issue, IssueType, Language, Position, Severity};
use crate::utils::text;

/// 基础得分
const BASE_SCORE: u8 = 85;
/// 缺少过渡词的扣分
const MISSING_TRANSITIONS_PENALTY: u8 = 15;

/// 西语过渡词
static TRANSITION_WORDS_ES: phf::Set<&'static str> = phf_set! {
    "además",
    "sin embargo",
    "por otro lado",
    "en consecuencia",
    "finalmente",
};

/// 英语过渡词
static TRANSITION_WORDS_EN: phf::Set<&'static str> = phf_set! {
    "furthermore",
    "however",
    "on the other hand",
    "consequently",
    "finally",
};

/// 连贯性分析结果
#[derive(Debug, Clone, Default)]
pub struct CoherenceAnalysis {
    pub score: u8,
    pub issues: Vec<Issue>,
}

/// 连贯性分析器
#[derive(Debug, Default)]
pub struct CoherenceAnalyzer;

impl CoherenceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 分析段落之间的连贯性
    pub fn analyze(&self, input: &str, language: Language) -> CoherenceAnalysis {
        let mut score = BASE_SCORE;
        let mut issues = Vec::new();

        let paragraphs = text::split_paragraphs(input);

        if paragraphs.len() > 2 {
            let transition_words = match language {
                Language::Es => &TRANSITION_WORDS_ES,
                Language::En => &TRANSITION_WORDS_EN,
            };

            let has_transitions = paragraphs.iter().any(|paragraph| {
                let lowered = paragraph.to_lowercase();
                transition_words.iter().any(|word| lowered.contains(word))
            });

            if !has_transitions {
                issues.push(Issue {
                    issue_type: IssueType::Coherence,
                    severity: Severity::Medium,
                    position: Position {
                        start: 0,
                        end: text::char_len(input),
                    },
                    original_text: "Estructura del texto".to_string(),
                    suggestion: "Agrega palabras de transición entre párrafos".to_string(),
                    explanation: "Las transiciones mejoran la fluidez y coherencia del texto"
                        .to_string(),
                    confidence: 0.75,
                    is_resolved: false,
                });
                score -= MISSING_TRANSITIONS_PENALTY;
            }
        }

        debug!(
            "连贯性分析完成: {} 个段落 | 得分 {}",
            paragraphs.len(),
            score
        );

        CoherenceAnalysis { score, issues }
    }
}
