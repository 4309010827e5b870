//! 文档实体
//!
//! 文档由上传用户持有；审阅流水线只改写 status 与 processing_metadata。
//! word_count 在内容写入时派生，内容变化时必须重算。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::text;

/// 文档语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// 西班牙语
    Es,
    /// 英语
    En,
}

impl Language {
    /// 语言代码
    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    /// 提示词中使用的语言名称
    pub fn name(self) -> &'static str {
        match self {
            Language::Es => "español",
            Language::En => "inglés",
        }
    }
}

/// 引用格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    Apa,
    Ieee,
    Mla,
    Chicago,
}

impl CitationStyle {
    /// 显示名称（用于提示和建议文案）
    pub fn name(self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Ieee => "IEEE",
            CitationStyle::Mla => "MLA",
            CitationStyle::Chicago => "Chicago",
        }
    }
}

/// 文档状态
///
/// 跟随驱动它的审阅生命周期：审阅未结束时为 processing，
/// 结束后与审阅的终态保持一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// 文档处理元数据（由审阅流水线在完成时填写）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetadata {
    pub processing_time_ms: u64,
    pub model_used: String,
    pub confidence: f64,
}

/// 文档实体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text_content: String,
    pub language: Language,
    pub citation_style: CitationStyle,
    pub status: DocumentStatus,
    pub word_count: usize,
    pub processing_metadata: ProcessingMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// 创建新文档
    ///
    /// 内容在写入前先做规范化清洗，word_count 随之派生。
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        text_content: &str,
        language: Language,
        citation_style: CitationStyle,
    ) -> Self {
        let text_content = text::clean_text(text_content);
        let word_count = text::word_count(&text_content);
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            text_content,
            language,
            citation_style,
            status: DocumentStatus::Pending,
            word_count,
            processing_metadata: ProcessingMetadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 改写文档内容并重算 word_count
    pub fn set_text_content(&mut self, text_content: &str) {
        self.text_content = text::clean_text(text_content);
        self.word_count = text::word_count(&self.text_content);
        self.updated_at = Utc::now();
    }

    /// 更新文档状态
    pub fn set_status(&mut self, status: DocumentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// 填写处理元数据
    pub fn set_processing_metadata(&mut self, metadata: ProcessingMetadata) {
        self.processing_metadata = metadata;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document(content: &str) -> Document {
        Document::new(
            Uuid::new_v4(),
            "Ensayo de prueba",
            content,
            Language::Es,
            CitationStyle::Apa,
        )
    }

    #[test]
    fn test_word_count_derived_on_create() {
        let doc = sample_document("uno dos tres cuatro");
        assert_eq!(doc.word_count, 4);
        assert_eq!(doc.status, DocumentStatus::Pending);
    }

    #[test]
    fn test_word_count_recomputed_on_content_change() {
        let mut doc = sample_document("uno dos");
        doc.set_text_content("uno dos tres cuatro cinco");
        assert_eq!(doc.word_count, 5);
    }

    #[test]
    fn test_content_is_cleaned_on_write() {
        let doc = sample_document("  Texto   con    espacios  ");
        assert_eq!(doc.text_content, "Texto con espacios");
        assert_eq!(doc.word_count, 3);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let doc = sample_document("contenido");
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("textContent").is_some());
        assert!(json.get("wordCount").is_some());
        assert_eq!(json["citationStyle"], "apa");
        assert_eq!(json["language"], "es");
    }
}
