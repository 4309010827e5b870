//! 审阅处理上下文
//!
//! 封装"我正在为哪份文档跑哪条审阅"这一信息

use std::fmt::Display;

use uuid::Uuid;

use crate::models::{CitationStyle, Document, Language, Review};

/// 审阅处理上下文
///
/// 包含处理单条审阅所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct ReviewCtx {
    /// 审阅ID
    pub review_id: Uuid,

    /// 文档ID
    pub document_id: Uuid,

    /// 文档所属用户ID
    pub user_id: Uuid,

    /// 文档语言
    pub language: Language,

    /// 引用格式
    pub citation_style: CitationStyle,
}

impl ReviewCtx {
    /// 创建新的审阅上下文
    pub fn new(
        review_id: Uuid,
        document_id: Uuid,
        user_id: Uuid,
        language: Language,
        citation_style: CitationStyle,
    ) -> Self {
        Self {
            review_id,
            document_id,
            user_id,
            language,
            citation_style,
        }
    }

    /// 由审阅记录和文档构建上下文
    pub fn from_pair(review: &Review, document: &Document) -> Self {
        Self::new(
            review.id,
            document.id,
            document.user_id,
            document.language,
            document.citation_style,
        )
    }
}

impl Display for ReviewCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[审阅 #{} 文档 #{} 语言 {}]",
            self.review_id,
            self.document_id,
            self.language.code()
        )
    }
}
