//! 审阅流水线端到端测试
//!
//! 使用内存存储和注入的文本生成器，不依赖真实 LLM 服务。

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;

use review_pipeline::clients::TextGenerator;
use review_pipeline::error::{AppError, ReviewError};
use review_pipeline::models::{
    CitationStyle, Document, DocumentStatus, Language, Review, ReviewStatus, Severity, User,
};
use review_pipeline::services::StubPlagiarismDetector;
use review_pipeline::store::{
    DocumentStore, InMemoryDocumentStore, InMemoryReviewStore, InMemoryUserStore, ReviewStore,
    UserStore,
};
use review_pipeline::{ReviewFlow, ReviewProcessor};

/// 恒定失败的生成器：模拟 LLM 服务不可用
struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _user: &str, _system: Option<&str>) -> anyhow::Result<String> {
        Err(anyhow!("servicio no disponible"))
    }
}

struct Stores {
    reviews: Arc<InMemoryReviewStore>,
    documents: Arc<InMemoryDocumentStore>,
    users: Arc<InMemoryUserStore>,
}

fn stores() -> Stores {
    Stores {
        reviews: Arc::new(InMemoryReviewStore::new()),
        documents: Arc::new(InMemoryDocumentStore::new()),
        users: Arc::new(InMemoryUserStore::new()),
    }
}

fn processor(stores: &Stores) -> Arc<ReviewProcessor> {
    Arc::new(ReviewProcessor::with_components(
        Arc::new(ReviewFlow::with_generator(Arc::new(FailingGenerator))),
        Arc::new(StubPlagiarismDetector::new()),
        stores.reviews.clone(),
        stores.documents.clone(),
        stores.users.clone(),
    ))
}

/// 1200+ 字符、不含引用的西语文稿
fn citation_free_text() -> String {
    let body = "La fotosíntesis transforma la energía luminosa en energía química dentro de los cloroplastos. \
                Este proceso sustenta la vida vegetal y regula el ciclo del carbono del planeta. "
        .repeat(7);
    assert!(body.chars().count() > 1200);
    body
}

async fn seed(stores: &Stores, text: &str) -> (User, Document) {
    let user = User::new("Ana");
    stores.users.save(&user).await.unwrap();

    let document = Document::new(
        user.id,
        "Ensayo de prueba",
        text,
        Language::Es,
        CitationStyle::Apa,
    );
    stores.documents.save(&document).await.unwrap();

    (user, document)
}

/// 轮询直到审阅进入终态
async fn wait_for_terminal(store: &InMemoryReviewStore, review_id: uuid::Uuid) -> Review {
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if let Some(review) = store.get(review_id).await.unwrap() {
            if review.is_terminal() {
                return review;
            }
        }
    }
    panic!("审阅在限定时间内没有进入终态");
}

#[tokio::test]
async fn test_pipeline_completes_despite_llm_outage() {
    let stores = stores();
    let processor = processor(&stores);
    let (user, document) = seed(&stores, &citation_free_text()).await;

    let created = processor.create_review(document.id, user.id).await.unwrap();
    assert_eq!(created.status, ReviewStatus::Pending);

    // 创建后文档立即进入 processing
    let doc = stores.documents.get(document.id).await.unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Processing);

    let review = wait_for_terminal(&stores.reviews, created.id).await;

    // LLM 全程失败，语法阶段退回兜底值，流水线仍然完成
    assert_eq!(review.status, ReviewStatus::Completed);
    assert_eq!(review.scores.grammar, 75);
    assert_eq!(review.scores.spelling, 80);
    assert!(review.overall_score <= 100);

    // 1200+ 字符且无引用：引用阶段得分 ≤ 60 并带 high 问题
    assert!(review.scores.citation <= 60);
    assert!(review
        .issues
        .iter()
        .any(|i| i.severity == Severity::High));

    // 摘要计数与问题列表一致
    assert_eq!(review.summary.total_issues, review.issues.len());

    // 查重结果符合占位契约
    assert!((0.0..20.0).contains(&review.plagiarism_check.similarity));
    assert_eq!(
        review.plagiarism_check.is_original,
        review.plagiarism_check.similarity < 15.0
    );

    // 文档与审阅终态一致，元数据已填写
    let doc = stores.documents.get(document.id).await.unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Completed);
    assert_eq!(doc.processing_metadata.model_used, "combined-analysis");

    // 用户滚动统计已更新
    let user = stores.users.get(user.id).await.unwrap().unwrap();
    assert_eq!(user.statistics.reviews_received, 1);
    assert_eq!(
        user.statistics.average_score,
        f64::from(review.overall_score)
    );
}

#[tokio::test]
async fn test_duplicate_review_rejected_while_in_flight() {
    let stores = stores();
    let processor = processor(&stores);
    let (user, document) = seed(&stores, "Texto breve.").await;

    // 直接在存储中放一条 pending 审阅，模拟已有在途审阅
    let existing = Review::new(document.id, user.id);
    stores.reviews.insert_pending(&existing).await.unwrap();

    let err = processor
        .create_review(document.id, user.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Review(ReviewError::AlreadyInProgress { .. })
    ));
}

#[tokio::test]
async fn test_new_review_allowed_after_terminal() {
    let stores = stores();
    let processor = processor(&stores);
    let (user, document) = seed(&stores, "Texto breve.").await;

    let first = processor.create_review(document.id, user.id).await.unwrap();
    let first = wait_for_terminal(&stores.reviews, first.id).await;
    assert!(first.is_terminal());

    // 旧审阅进入终态后允许重新创建
    let second = processor.create_review(document.id, user.id).await.unwrap();
    assert_eq!(second.status, ReviewStatus::Pending);
    let second = wait_for_terminal(&stores.reviews, second.id).await;
    assert_eq!(second.status, ReviewStatus::Completed);
}

#[tokio::test]
async fn test_missing_document_rejected() {
    let stores = stores();
    let processor = processor(&stores);

    let err = processor
        .create_review(uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Review(ReviewError::DocumentNotFound { .. })
    ));
}

#[tokio::test]
async fn test_rolling_statistics_across_reviews() {
    let stores = stores();
    let processor = processor(&stores);
    let (user, first_doc) = seed(&stores, &citation_free_text()).await;

    let second_doc = Document::new(
        user.id,
        "Segundo ensayo",
        &citation_free_text(),
        Language::Es,
        CitationStyle::Apa,
    );
    stores.documents.save(&second_doc).await.unwrap();

    let first = processor.create_review(first_doc.id, user.id).await.unwrap();
    let first = wait_for_terminal(&stores.reviews, first.id).await;

    let second = processor
        .create_review(second_doc.id, user.id)
        .await
        .unwrap();
    let second = wait_for_terminal(&stores.reviews, second.id).await;

    let user = stores.users.get(user.id).await.unwrap().unwrap();
    assert_eq!(user.statistics.reviews_received, 2);

    let expected =
        (f64::from(first.overall_score) + f64::from(second.overall_score)) / 2.0;
    assert!((user.statistics.average_score - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_review_json_contract() {
    let stores = stores();
    let processor = processor(&stores);
    let (user, document) = seed(&stores, "Texto breve.").await;

    let created = processor.create_review(document.id, user.id).await.unwrap();
    let review = wait_for_terminal(&stores.reviews, created.id).await;

    let json = serde_json::to_value(&review).unwrap();
    assert_eq!(json["status"], "completed");
    assert!(json.get("overallScore").is_some());
    assert!(json.get("plagiarismCheck").is_some());
    assert!(json["summary"].get("improvementSuggestions").is_some());
    assert!(json["aiAnalysis"].get("processingTimeMs").is_some());
}
