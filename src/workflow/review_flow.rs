//! 文本分析编排 - 流程层
//!
//! 核心职责：定义"一次完整文本分析"的流程
//!
//! 四个子分析器相互独立，并发执行；各自的失败在各自边界内
//! 消化（见 services 各模块），这里只负责合并结果：
//! 得分表、问题列表、改进建议、总体置信度和耗时。

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::clients::{LlmClient, TextGenerator};
use crate::config::Config;
use crate::models::{Issue, Language, Scores, Severity};
use crate::services::{CitationAnalyzer, CoherenceAnalyzer, GrammarAnalyzer, StyleAnalyzer};
use crate::utils::text;
use crate::workflow::review_ctx::ReviewCtx;

/// 原创性占位得分（真实值由查重模块单独计算）
const ORIGINALITY_PLACEHOLDER: u8 = 85;
/// 低于该得分的维度会生成改进建议
const SUGGESTION_THRESHOLD: u8 = 70;
/// 组合分析的模型标签
const COMBINED_MODEL: &str = "combined-analysis";

/// 分析元数据
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    pub processing_time_ms: u64,
    pub model: String,
    pub confidence: f64,
    pub word_count: usize,
    pub language: Language,
}

/// 一次完整文本分析的结果
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub scores: Scores,
    pub issues: Vec<Issue>,
    pub improvement_suggestions: Vec<String>,
    pub metadata: AnalysisMetadata,
}

/// 文本分析流程
///
/// - 编排四个子分析器的并发执行
/// - 合并得分、问题与建议
/// - 不持有审阅/文档实体，不碰存储
pub struct ReviewFlow {
    grammar: GrammarAnalyzer,
    style: StyleAnalyzer,
    coherence: CoherenceAnalyzer,
    citation: CitationAnalyzer,
}

impl ReviewFlow {
    /// 创建新的分析流程（使用配置中的 LLM 客户端）
    pub fn new(config: &Config) -> Self {
        Self::with_generator(Arc::new(LlmClient::new(config)))
    }

    /// 使用自定义文本生成器创建分析流程
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            grammar: GrammarAnalyzer::new(generator),
            style: StyleAnalyzer::new(),
            coherence: CoherenceAnalyzer::new(),
            citation: CitationAnalyzer::new(),
        }
    }

    /// 执行完整文本分析
    pub async fn analyze_text(&self, input: &str, ctx: &ReviewCtx) -> AnalysisResult {
        let start = Instant::now();

        info!("{} 🔍 开始文本分析...", ctx);

        // ========== 四个子分析器并发执行 ==========
        let (grammar, style, coherence, citation) = tokio::join!(
            self.grammar.analyze(input, ctx.language),
            async { self.style.analyze(input, ctx.language) },
            async { self.coherence.analyze(input, ctx.language) },
            async { self.citation.analyze(input, ctx.citation_style) },
        );

        let scores = Scores {
            grammar: grammar.score,
            spelling: grammar.spelling_score,
            style: style.score,
            coherence: coherence.score,
            citation: citation.score,
            originality: ORIGINALITY_PLACEHOLDER,
        };

        // 合并问题列表（插入顺序 = 检出顺序）
        let mut issues = grammar.issues;
        issues.extend(style.issues);
        issues.extend(coherence.issues);
        issues.extend(citation.issues);

        let improvement_suggestions = build_improvement_suggestions(&scores, &issues);
        let confidence = overall_confidence(&scores);
        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "{} ✓ 文本分析完成，耗时 {}ms，发现 {} 个问题",
            ctx,
            processing_time_ms,
            issues.len()
        );

        AnalysisResult {
            scores,
            issues,
            improvement_suggestions,
            metadata: AnalysisMetadata {
                processing_time_ms,
                model: COMBINED_MODEL.to_string(),
                confidence,
                word_count: text::word_count(input),
                language: ctx.language,
            },
        }
    }
}

/// 根据得分和问题生成改进建议
fn build_improvement_suggestions(scores: &Scores, issues: &[Issue]) -> Vec<String> {
    let mut suggestions = Vec::new();

    if scores.grammar < SUGGESTION_THRESHOLD {
        suggestions.push("Revisa la gramática y ortografía del texto".to_string());
    }
    if scores.style < SUGGESTION_THRESHOLD {
        suggestions.push("Mejora el estilo y la claridad de la escritura".to_string());
    }
    if scores.coherence < SUGGESTION_THRESHOLD {
        suggestions.push("Trabaja en la coherencia y fluidez entre párrafos".to_string());
    }
    if scores.citation < SUGGESTION_THRESHOLD {
        suggestions.push("Verifica el formato y completitud de las citas".to_string());
    }

    let critical_issues = issues
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .count();
    if critical_issues > 0 {
        suggestions.push(format!(
            "Atiende los {} problemas críticos identificados",
            critical_issues
        ));
    }

    suggestions
}

/// 总体置信度：min(1, 平均分/100 + 0.2)
fn overall_confidence(scores: &Scores) -> f64 {
    let sum = u32::from(scores.grammar)
        + u32::from(scores.spelling)
        + u32::from(scores.style)
        + u32::from(scores.coherence)
        + u32::from(scores.citation)
        + u32::from(scores.originality);
    let avg = f64::from(sum) / 6.0;

    (avg / 100.0 + 0.2).min(1.0)
}
