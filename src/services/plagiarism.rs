//! 查重 - 业务能力层
//!
//! 对外契约固定为 [`PlagiarismCheck`] 的字段和 15% 阈值；
//! 实现可替换：当前是占位桩，生产实现应换成基于向量索引的
//! 近邻检索，调用方不受影响。

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::models::{Language, PlagiarismCheck, PlagiarismSource};

/// 低于该相似度视为原创
pub const ORIGINALITY_THRESHOLD: f64 = 15.0;

/// 查重能力
#[async_trait]
pub trait PlagiarismDetector: Send + Sync {
    /// 检测文本与已知来源的相似度
    async fn detect(&self, input: &str, language: Language) -> Result<PlagiarismCheck>;
}

/// 占位实现：有界随机相似度
///
/// 没有真实的相似度索引时使用。相似度落在 [0, 20)，
/// 超过阈值时合成一个来源条目。
#[derive(Debug, Default)]
pub struct StubPlagiarismDetector;

impl StubPlagiarismDetector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlagiarismDetector for StubPlagiarismDetector {
    async fn detect(&self, input: &str, _language: Language) -> Result<PlagiarismCheck> {
        let similarity = rand::thread_rng().gen_range(0.0..20.0);
        let is_original = similarity < ORIGINALITY_THRESHOLD;

        let mut sources = Vec::new();
        if !is_original {
            sources.push(PlagiarismSource {
                url: "https://example.com/academic-paper".to_string(),
                title: "Similar Academic Paper".to_string(),
                similarity,
                matched_text: input.chars().take(100).collect::<String>() + "...",
            });
        }

        debug!(
            "查重完成: 相似度 {:.1}% | 原创: {} | 来源数: {}",
            similarity,
            is_original,
            sources.len()
        );

        Ok(PlagiarismCheck {
            similarity,
            sources,
            is_original,
            confidence: 0.85,
        })
    }
}
