//! 审阅实体
//!
//! 一次审阅对应一份文档的一轮分析。状态机：
//! pending → processing → {completed, failed}，终态不可再转换。
//! 非终态期间只有持有它的流水线任务写入；终态后仅允许用户反馈
//! 和问题的 resolved 标记变化。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ReviewError;

/// 审阅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ReviewStatus {
    /// 是否为终态
    pub fn is_terminal(self) -> bool {
        matches!(self, ReviewStatus::Completed | ReviewStatus::Failed)
    }
}

/// 问题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Grammar,
    Spelling,
    Style,
    Coherence,
    Citation,
    Plagiarism,
    Structure,
}

/// 问题严重程度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// 文本位置（相对 Document.text_content 的字符偏移）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

fn default_issue_confidence() -> f64 {
    0.5
}

/// 单个问题
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub position: Position,
    pub original_text: String,
    pub suggestion: String,
    pub explanation: String,
    #[serde(default = "default_issue_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub is_resolved: bool,
}

/// 六个维度的分项得分（0-100）
///
/// 封闭记录而不是开放 map：聚合权重表可以被静态穷举检查。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub grammar: u8,
    pub spelling: u8,
    pub style: u8,
    pub coherence: u8,
    pub citation: u8,
    pub originality: u8,
}

/// 审阅摘要
///
/// 计数字段必须在 issues 变化后重算，见 [`Review::recompute_summary`]。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub resolved_issues: usize,
    pub improvement_suggestions: Vec<String>,
}

/// AI 分析元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub model: String,
    pub processing_time_ms: u64,
    pub confidence: f64,
}

impl Default for AiAnalysis {
    fn default() -> Self {
        Self {
            model: "gemini".to_string(),
            processing_time_ms: 0,
            confidence: 0.0,
        }
    }
}

/// 相似来源
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismSource {
    pub url: String,
    pub title: String,
    pub similarity: f64,
    pub matched_text: String,
}

/// 查重结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismCheck {
    /// 相似度百分比（0-100）
    pub similarity: f64,
    pub sources: Vec<PlagiarismSource>,
    pub is_original: bool,
    pub confidence: f64,
}

impl Default for PlagiarismCheck {
    fn default() -> Self {
        Self {
            similarity: 0.0,
            sources: Vec::new(),
            is_original: true,
            confidence: 0.0,
        }
    }
}

/// 用户反馈（仅完成后可填写）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub is_helpful: Option<bool>,
    pub rating: Option<u8>,
    pub comments: Option<String>,
}

/// 审阅实体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub status: ReviewStatus,
    /// 派生字段：始终等于分项得分的加权聚合，不允许独立设置
    pub overall_score: u8,
    pub scores: Scores,
    /// 插入顺序 = 检出顺序，不保证排序
    pub issues: Vec<Issue>,
    pub summary: ReviewSummary,
    pub ai_analysis: AiAnalysis,
    pub plagiarism_check: PlagiarismCheck,
    pub feedback: Option<Feedback>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// 创建一条待处理的审阅记录
    pub fn new(document_id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            document_id,
            user_id,
            status: ReviewStatus::Pending,
            overall_score: 0,
            scores: Scores::default(),
            issues: Vec::new(),
            summary: ReviewSummary::default(),
            ai_analysis: AiAnalysis::default(),
            plagiarism_check: PlagiarismCheck::default(),
            feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 是否处于终态
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// 状态转换
    ///
    /// 合法转换：pending → processing、pending → failed、
    /// processing → completed、processing → failed。其余一律拒绝。
    pub fn transition_to(&mut self, next: ReviewStatus) -> Result<(), ReviewError> {
        use ReviewStatus::*;

        let allowed = matches!(
            (self.status, next),
            (Pending, Processing) | (Pending, Failed) | (Processing, Completed) | (Processing, Failed)
        );

        if !allowed {
            return Err(ReviewError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 替换问题列表并重算摘要计数
    pub fn set_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
        self.recompute_summary();
    }

    /// 重算摘要计数（total / critical / resolved）
    ///
    /// improvement_suggestions 由分析编排器产出，这里不动。
    pub fn recompute_summary(&mut self) {
        self.summary.total_issues = self.issues.len();
        self.summary.critical_issues = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        self.summary.resolved_issues = self.issues.iter().filter(|i| i.is_resolved).count();
    }

    /// 标记某个问题已解决（仅完成后允许）
    pub fn resolve_issue(&mut self, index: usize) -> Result<(), ReviewError> {
        if self.status != ReviewStatus::Completed {
            return Err(ReviewError::NotCompleted {
                review_id: self.id,
                status: self.status,
            });
        }
        if index >= self.issues.len() {
            return Err(ReviewError::IssueIndexOutOfRange {
                index,
                max: self.issues.len(),
            });
        }

        self.issues[index].is_resolved = true;
        self.recompute_summary();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 添加用户反馈（仅完成后允许，评分限定 1-5）
    pub fn add_feedback(&mut self, feedback: Feedback) -> Result<(), ReviewError> {
        if self.status != ReviewStatus::Completed {
            return Err(ReviewError::NotCompleted {
                review_id: self.id,
                status: self.status,
            });
        }
        if let Some(rating) = feedback.rating {
            if !(1..=5).contains(&rating) {
                return Err(ReviewError::InvalidRating { rating });
            }
        }

        self.feedback = Some(feedback);
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity, is_resolved: bool) -> Issue {
        Issue {
            issue_type: IssueType::Grammar,
            severity,
            position: Position::default(),
            original_text: "texto".to_string(),
            suggestion: "sugerencia".to_string(),
            explanation: "explicación".to_string(),
            confidence: 0.8,
            is_resolved,
        }
    }

    #[test]
    fn test_summary_recomputed_from_issues() {
        let mut review = Review::new(Uuid::new_v4(), Uuid::new_v4());
        review.set_issues(vec![
            issue(Severity::Critical, true),
            issue(Severity::Medium, false),
        ]);

        assert_eq!(review.summary.total_issues, 2);
        assert_eq!(review.summary.critical_issues, 1);
        assert_eq!(review.summary.resolved_issues, 1);
    }

    #[test]
    fn test_valid_lifecycle() {
        let mut review = Review::new(Uuid::new_v4(), Uuid::new_v4());
        review.transition_to(ReviewStatus::Processing).unwrap();
        review.transition_to(ReviewStatus::Completed).unwrap();
        assert!(review.is_terminal());
    }

    #[test]
    fn test_terminal_review_never_transitions() {
        let mut review = Review::new(Uuid::new_v4(), Uuid::new_v4());
        review.transition_to(ReviewStatus::Processing).unwrap();
        review.transition_to(ReviewStatus::Failed).unwrap();

        let err = review.transition_to(ReviewStatus::Processing);
        assert!(matches!(err, Err(ReviewError::InvalidTransition { .. })));
    }

    #[test]
    fn test_pending_cannot_jump_to_completed() {
        let mut review = Review::new(Uuid::new_v4(), Uuid::new_v4());
        let err = review.transition_to(ReviewStatus::Completed);
        assert!(matches!(err, Err(ReviewError::InvalidTransition { .. })));
    }

    #[test]
    fn test_resolve_issue_requires_completion() {
        let mut review = Review::new(Uuid::new_v4(), Uuid::new_v4());
        review.set_issues(vec![issue(Severity::Low, false)]);

        assert!(matches!(
            review.resolve_issue(0),
            Err(ReviewError::NotCompleted { .. })
        ));

        review.transition_to(ReviewStatus::Processing).unwrap();
        review.transition_to(ReviewStatus::Completed).unwrap();
        review.resolve_issue(0).unwrap();
        assert_eq!(review.summary.resolved_issues, 1);
    }

    #[test]
    fn test_feedback_rules() {
        let mut review = Review::new(Uuid::new_v4(), Uuid::new_v4());

        // 未完成时拒绝反馈
        assert!(review.add_feedback(Feedback::default()).is_err());

        review.transition_to(ReviewStatus::Processing).unwrap();
        review.transition_to(ReviewStatus::Completed).unwrap();

        // 非法评分
        let bad = Feedback {
            rating: Some(6),
            ..Feedback::default()
        };
        assert!(matches!(
            review.add_feedback(bad),
            Err(ReviewError::InvalidRating { rating: 6 })
        ));

        let ok = Feedback {
            is_helpful: Some(true),
            rating: Some(5),
            comments: Some("Muy útil".to_string()),
        };
        review.add_feedback(ok).unwrap();
        assert!(review.feedback.is_some());
    }

    #[test]
    fn test_issue_deserializes_llm_shape() {
        // LLM 响应里没有 confidence / isResolved 字段时使用默认值
        let raw = r#"{
            "type": "spelling",
            "severity": "high",
            "position": {"start": 10, "end": 15},
            "originalText": "ortografia",
            "suggestion": "ortografía",
            "explanation": "Falta la tilde"
        }"#;
        let parsed: Issue = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.issue_type, IssueType::Spelling);
        assert_eq!(parsed.severity, Severity::High);
        assert_eq!(parsed.confidence, 0.5);
        assert!(!parsed.is_resolved);
    }
}
