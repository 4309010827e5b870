//! 演示程序：用内存存储跑通一条审阅的完整流水线

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use review_pipeline::models::{CitationStyle, Document, Language, User};
use review_pipeline::store::{
    DocumentStore, InMemoryDocumentStore, InMemoryReviewStore, InMemoryUserStore, ReviewStore,
    UserStore,
};
use review_pipeline::{Config, ReviewProcessor};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    if config.verbose_logging {
        review_pipeline::utils::logging::init_verbose();
    } else {
        review_pipeline::utils::logging::init();
    }

    // 准备内存存储和演示数据
    let review_store = Arc::new(InMemoryReviewStore::new());
    let document_store = Arc::new(InMemoryDocumentStore::new());
    let user_store = Arc::new(InMemoryUserStore::new());

    let user = User::new("Usuario de demostración");
    user_store.save(&user).await?;

    let document = Document::new(
        user.id,
        "Ensayo sobre el cambio climático",
        "El cambio climático es uno de los desafíos más importantes de nuestro tiempo. \
         Sus efectos se observan en todos los continentes.\n\n\
         Las temperaturas globales continúan aumentando cada década. \
         Los ecosistemas marinos sufren transformaciones profundas.\n\n\
         Finalmente, la acción coordinada entre naciones sigue siendo la única \
         respuesta proporcional al tamaño del problema.",
        Language::Es,
        CitationStyle::Apa,
    );
    document_store.save(&document).await?;

    let processor = Arc::new(ReviewProcessor::new(
        &config,
        review_store.clone(),
        document_store.clone(),
        user_store.clone(),
    ));

    // 创建审阅：本调用在 pending 落库后立即返回，分析在后台执行
    let review = processor.create_review(document.id, user.id).await?;
    info!("审阅已创建: {} (状态: {:?})", review.id, review.status);

    // 轮询直到审阅进入终态
    let review = loop {
        tokio::time::sleep(Duration::from_millis(200)).await;

        match review_store.get(review.id).await? {
            Some(r) if r.is_terminal() => break r,
            Some(_) => continue,
            None => anyhow::bail!("审阅记录丢失"),
        }
    };

    info!("审阅结束: 状态 {:?}，总分 {}", review.status, review.overall_score);

    println!("{}", serde_json::to_string_pretty(&review)?);

    Ok(())
}
