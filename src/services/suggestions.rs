//! 改进建议生成 - 业务能力层
//!
//! 独立于审阅流水线的 LLM 能力：针对一篇文稿生成分类改进建议。
//! 解析策略与语法分析一致：提取第一个配平的 JSON 对象，
//! 失败时退回固定的兜底建议。

use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::{extract_json_object, TextGenerator};
use crate::models::{CitationStyle, Language};

/// 单条改进建议
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub category: String,
    pub priority: String,
    pub suggestion: String,
    pub explanation: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestionResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

/// 建议生成服务
pub struct SuggestionService {
    generator: Arc<dyn TextGenerator>,
}

impl SuggestionService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 生成分类改进建议
    ///
    /// # 参数
    /// - `input`: 文稿内容
    /// - `language`: 文稿语言
    /// - `citation_style`: 引用格式（建议中引用相关的文案会提到它）
    /// - `category`: 文稿类型（essay / thesis / article / report）
    pub async fn generate(
        &self,
        input: &str,
        language: Language,
        citation_style: CitationStyle,
        category: &str,
    ) -> Vec<Suggestion> {
        match self
            .try_generate(input, language, citation_style, category)
            .await
        {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!("建议生成失败，使用兜底建议: {}", e);
                fallback_suggestions()
            }
        }
    }

    async fn try_generate(
        &self,
        input: &str,
        language: Language,
        citation_style: CitationStyle,
        category: &str,
    ) -> Result<Vec<Suggestion>> {
        let user_message = build_prompt(input, language, citation_style, category);

        let response = self.generator.generate(&user_message, None).await?;

        debug!("建议生成响应长度: {} 字符", response.len());

        let json = extract_json_object(&response).ok_or_else(|| anyhow!("响应中未找到JSON对象"))?;
        let raw: RawSuggestionResponse = serde_json::from_str(json)?;

        Ok(raw.suggestions)
    }
}

fn build_prompt(
    input: &str,
    language: Language,
    citation_style: CitationStyle,
    category: &str,
) -> String {
    format!(
        r#"Genera sugerencias específicas para mejorar este {} académico en {}:

"{}"

Proporciona sugerencias en las siguientes categorías:
1. Estructura y organización
2. Claridad y coherencia
3. Estilo académico
4. Uso de evidencia y citas (formato {})
5. Conclusiones y argumentación

Responde EXCLUSIVAMENTE en formato JSON:
{{
  "suggestions": [
    {{
      "category": "estructura|claridad|estilo|evidencia|argumentación",
      "priority": "high|medium|low",
      "suggestion": "sugerencia específica",
      "explanation": "explicación detallada",
      "example": "ejemplo opcional"
    }}
  ]
}}"#,
        category,
        language.name(),
        input,
        citation_style.name()
    )
}

/// 兜底建议
fn fallback_suggestions() -> Vec<Suggestion> {
    vec![Suggestion {
        category: "estructura".to_string(),
        priority: "medium".to_string(),
        suggestion: "Considera agregar subtítulos para mejorar la organización".to_string(),
        explanation: "Los subtítulos ayudan a los lectores a seguir la estructura del argumento"
            .to_string(),
        example: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _user: &str, _system: Option<&str>) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _user: &str, _system: Option<&str>) -> Result<String> {
            Err(anyhow!("servicio no disponible"))
        }
    }

    #[tokio::test]
    async fn test_parses_suggestion_list() {
        let response = r#"Aquí tienes:
{"suggestions": [{"category": "claridad", "priority": "high", "suggestion": "Define los términos clave", "explanation": "El lector necesita contexto"}]}"#;
        let service = SuggestionService::new(Arc::new(FixedGenerator(response.to_string())));

        let suggestions = service
            .generate("Texto.", Language::Es, CitationStyle::Apa, "essay")
            .await;

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category, "claridad");
        assert_eq!(suggestions[0].example, None);
    }

    #[tokio::test]
    async fn test_failure_yields_fallback_suggestion() {
        let service = SuggestionService::new(Arc::new(FailingGenerator));

        let suggestions = service
            .generate("Texto.", Language::Es, CitationStyle::Apa, "essay")
            .await;

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category, "estructura");
        assert_eq!(suggestions[0].priority, "medium");
    }
}
