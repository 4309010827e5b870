//! 得分聚合 - 业务能力层
//!
//! 固定权重的加权平均。为了和平台既有数据保持逐位一致，
//! 权重与取整规则不允许调整。

use crate::models::Scores;

/// 得分维度
///
/// 封闭枚举而不是开放 map：权重表通过穷举 match 静态检查，
/// 新增维度时编译器会强制补上权重。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    Grammar,
    Spelling,
    Style,
    Coherence,
    Citation,
    Originality,
}

impl ScoreCategory {
    /// 聚合权重
    pub fn weight(self) -> f64 {
        match self {
            ScoreCategory::Grammar => 0.25,
            ScoreCategory::Spelling => 0.15,
            ScoreCategory::Style => 0.20,
            ScoreCategory::Coherence => 0.20,
            ScoreCategory::Citation => 0.15,
            ScoreCategory::Originality => 0.05,
        }
    }
}

/// 加权聚合若干维度的得分
///
/// 结果 = round(Σ score·weight / Σ weight)，空列表返回 0。
/// 取整使用 `f64::round`，.5 一律远离零。
pub fn aggregate(entries: &[(ScoreCategory, f64)]) -> u8 {
    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for (category, score) in entries {
        total_score += score * category.weight();
        total_weight += category.weight();
    }

    if total_weight > 0.0 {
        (total_score / total_weight).round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// 六个维度的总分
pub fn overall_score(scores: &Scores) -> u8 {
    aggregate(&[
        (ScoreCategory::Grammar, f64::from(scores.grammar)),
        (ScoreCategory::Spelling, f64::from(scores.spelling)),
        (ScoreCategory::Style, f64::from(scores.style)),
        (ScoreCategory::Coherence, f64::from(scores.coherence)),
        (ScoreCategory::Citation, f64::from(scores.citation)),
        (ScoreCategory::Originality, f64::from(scores.originality)),
    ])
}
