//! 用户实体
//!
//! 流水线只关心用户的滚动统计；账号资料属于平台其余部分。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户滚动统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub documents_uploaded: u32,
    pub reviews_received: u32,
    pub average_score: f64,
}

impl UserStatistics {
    /// 记录一次完成的审阅，增量更新平均分
    ///
    /// average = (old_avg * (n - 1) + score) / n，n 为自增后的计数
    pub fn record_review(&mut self, overall_score: u8) {
        self.reviews_received += 1;
        let n = f64::from(self.reviews_received);
        self.average_score = (self.average_score * (n - 1.0) + f64::from(overall_score)) / n;
    }
}

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub statistics: UserStatistics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 创建新用户
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            statistics: UserStatistics::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 记录一次完成的审阅
    pub fn record_review(&mut self, overall_score: u8) {
        self.statistics.record_review(overall_score);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_review_sets_average() {
        let mut user = User::new("Ana");
        user.record_review(80);
        assert_eq!(user.statistics.reviews_received, 1);
        assert_eq!(user.statistics.average_score, 80.0);
    }

    #[test]
    fn test_rolling_average() {
        let mut user = User::new("Ana");
        user.record_review(80);
        user.record_review(90);
        assert_eq!(user.statistics.reviews_received, 2);
        assert_eq!(user.statistics.average_score, 85.0);

        user.record_review(70);
        assert!((user.statistics.average_score - 80.0).abs() < 1e-9);
    }
}
