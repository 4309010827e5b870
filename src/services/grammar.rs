//! 语法分析 - 业务能力层
//!
//! 唯一依赖外部 LLM 的分析阶段。把文本和结构化输出要求发给模型，
//! 从响应中防御性地提取 JSON；任何失败都不外抛，退回兜底结果，
//! 单个阶段的故障只降低结果质量，不中断整条流水线。

use std::sync::Arc;

use anyhow::{anyhow, Result};
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::clients::{extract_json_object, TextGenerator};
use crate::models::{Issue, IssueType, Language, Position, Severity};

/// 兜底的语法得分
const FALLBACK_SCORE: u8 = 75;
/// 兜底的拼写得分
const FALLBACK_SPELLING_SCORE: u8 = 80;

/// 语法分析结果
#[derive(Debug, Clone)]
pub struct GrammarAnalysis {
    pub score: u8,
    pub spelling_score: u8,
    pub issues: Vec<Issue>,
}

impl GrammarAnalysis {
    /// 阶段失败时的兜底结果
    pub fn fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            spelling_score: FALLBACK_SPELLING_SCORE,
            issues: Vec::new(),
        }
    }
}

/// LLM 返回的原始结构
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGrammarResponse {
    score: f64,
    #[serde(default = "default_spelling")]
    spelling_score: f64,
    #[serde(default)]
    issues: Vec<RawIssue>,
}

fn default_spelling() -> f64 {
    f64::from(FALLBACK_SPELLING_SCORE)
}

/// LLM 返回的原始问题条目（confidence 可能缺失）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssue {
    #[serde(rename = "type")]
    issue_type: IssueType,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    original_text: String,
    #[serde(default)]
    suggestion: String,
    #[serde(default)]
    explanation: String,
    confidence: Option<f64>,
}

impl RawIssue {
    /// 转换为领域问题；缺失的置信度补一个 [0.7, 1.0) 的随机值
    fn into_issue(self) -> Issue {
        let confidence = self
            .confidence
            .unwrap_or_else(|| rand::thread_rng().gen_range(0.7..1.0));

        Issue {
            issue_type: self.issue_type,
            severity: self.severity,
            position: self.position,
            original_text: self.original_text,
            suggestion: self.suggestion,
            explanation: self.explanation,
            confidence,
            is_resolved: false,
        }
    }
}

/// 语法分析器
pub struct GrammarAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl GrammarAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 分析语法和拼写
    ///
    /// 内部失败（API 错误、响应不可解析）不外抛：记录日志并返回兜底结果。
    pub async fn analyze(&self, input: &str, language: Language) -> GrammarAnalysis {
        match self.try_analyze(input, language).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("语法分析失败，使用兜底结果: {}", e);
                GrammarAnalysis::fallback()
            }
        }
    }

    async fn try_analyze(&self, input: &str, language: Language) -> Result<GrammarAnalysis> {
        let (user_message, system_message) = build_messages(input, language);

        let response = self
            .generator
            .generate(&user_message, Some(&system_message))
            .await?;

        debug!("语法分析响应长度: {} 字符", response.len());

        parse_response(&response)
    }
}

/// 构建语法分析的消息（user, system）
fn build_messages(input: &str, language: Language) -> (String, String) {
    let system_message = "Eres un revisor experto de textos académicos. \
                          Respondes exclusivamente con un único objeto JSON válido."
        .to_string();

    let user_message = format!(
        r#"Analiza la gramática y ortografía del siguiente texto en {}.
Identifica errores específicos y proporciona correcciones:

"{}"

Responde EXCLUSIVAMENTE en formato JSON con la siguiente estructura:
{{
  "score": número del 0-100,
  "spellingScore": número del 0-100,
  "issues": [
    {{
      "type": "grammar|spelling",
      "severity": "low|medium|high|critical",
      "position": {{"start": número, "end": número}},
      "originalText": "texto original",
      "suggestion": "corrección sugerida",
      "explanation": "explicación del error"
    }}
  ]
}}"#,
        language.name(),
        input
    );

    (user_message, system_message)
}

/// 解析语法分析的 LLM 响应
fn parse_response(response: &str) -> Result<GrammarAnalysis> {
    let json = extract_json_object(response).ok_or_else(|| anyhow!("响应中未找到JSON对象"))?;

    let raw: RawGrammarResponse = serde_json::from_str(json)?;

    Ok(GrammarAnalysis {
        score: raw.score.clamp(0.0, 100.0).round() as u8,
        spelling_score: raw.spelling_score.clamp(0.0, 100.0).round() as u8,
        issues: raw.issues.into_iter().map(RawIssue::into_issue).collect(),
    })
}
