//! 审阅流水线控制器 - 编排层
//!
//! ## 职责
//!
//! 本模块是审阅流水线的入口，驱动状态机
//! pending → processing → {completed, failed}。
//!
//! ## 核心功能
//!
//! 1. **创建审阅**：单飞校验后落库 pending，文档进入 processing
//! 2. **后台调度**：流水线以 tokio::spawn 派发，触发方立即返回
//! 3. **并发分析**：文本分析编排器与查重模块并发执行
//! 4. **结果回写**：得分聚合、问题摘要、AI 元数据、查重结果
//! 5. **状态同步**：文档状态/元数据与用户滚动统计跟随审阅终态
//! 6. **失败兜底**：尽力标记 failed；记录失败时再出错只写日志
//!
//! 本子系统没有自动重试：失败后重跑需要调用方重新创建审阅，
//! 旧审阅已是终态，单飞校验会放行。

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result, ReviewError};
use crate::models::{
    AiAnalysis, Document, DocumentStatus, PlagiarismCheck, ProcessingMetadata, Review, ReviewStatus,
};
use crate::services::{scoring, PlagiarismDetector, StubPlagiarismDetector};
use crate::store::{DocumentStore, ReviewStore, UserStore};
use crate::workflow::{ReviewCtx, ReviewFlow};

/// 审阅流水线控制器
///
/// 所有字段都是共享句柄，克隆成本低，后台任务直接克隆自身。
#[derive(Clone)]
pub struct ReviewProcessor {
    review_store: Arc<dyn ReviewStore>,
    document_store: Arc<dyn DocumentStore>,
    user_store: Arc<dyn UserStore>,
    flow: Arc<ReviewFlow>,
    plagiarism: Arc<dyn PlagiarismDetector>,
}

impl ReviewProcessor {
    /// 创建控制器（使用配置中的 LLM 客户端和占位查重实现）
    pub fn new(
        config: &Config,
        review_store: Arc<dyn ReviewStore>,
        document_store: Arc<dyn DocumentStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        Self::with_components(
            Arc::new(ReviewFlow::new(config)),
            Arc::new(StubPlagiarismDetector::new()),
            review_store,
            document_store,
            user_store,
        )
    }

    /// 注入自定义分析流程和查重实现
    pub fn with_components(
        flow: Arc<ReviewFlow>,
        plagiarism: Arc<dyn PlagiarismDetector>,
        review_store: Arc<dyn ReviewStore>,
        document_store: Arc<dyn DocumentStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            review_store,
            document_store,
            user_store,
            flow,
            plagiarism,
        }
    }

    /// 为文档创建一条审阅并调度流水线
    ///
    /// 单飞校验由存储层的有条件插入保证：同一文档存在非终态审阅时
    /// 返回 [`ReviewError::AlreadyInProgress`]。成功时 pending 审阅
    /// 已落库、文档进入 processing，流水线在后台执行，本调用立即返回。
    pub async fn create_review(&self, document_id: Uuid, user_id: Uuid) -> Result<Review> {
        let mut document = self
            .document_store
            .get(document_id)
            .await?
            .ok_or(ReviewError::DocumentNotFound { document_id })?;

        let review = Review::new(document_id, user_id);
        self.review_store.insert_pending(&review).await?;

        document.set_status(DocumentStatus::Processing);
        self.document_store.save(&document).await?;

        info!(
            "[审阅 #{}] 已创建，文档 #{} 进入处理",
            review.id, document_id
        );

        // 后台执行，触发方不等待流水线完成
        let processor = self.clone();
        let review_id = review.id;
        tokio::spawn(async move {
            processor.run_pipeline(review_id, document).await;
        });

        Ok(review)
    }

    /// 执行一条审阅的完整流水线
    ///
    /// 后台任务的顶层边界：任何错误都在这里转化为状态与日志，
    /// 不向 spawn 外传播。
    pub async fn run_pipeline(&self, review_id: Uuid, document: Document) {
        if let Err(e) = self.execute(review_id, &document).await {
            // 审阅记录消失：只记录，无后续动作
            if let Some(AppError::Review(ReviewError::NotFound { .. })) =
                e.downcast_ref::<AppError>()
            {
                error!("[审阅 #{}] 记录不存在，终止处理", review_id);
                return;
            }

            error!("[审阅 #{}] ❌ 处理失败: {:#}", review_id, e);
            self.mark_failed(review_id, document.id).await;
        }
    }

    async fn execute(&self, review_id: Uuid, document: &Document) -> anyhow::Result<()> {
        info!("[审阅 #{}] 开始处理", review_id);

        let mut review = self
            .review_store
            .get(review_id)
            .await?
            .ok_or(AppError::Review(ReviewError::NotFound { review_id }))?;

        review.transition_to(ReviewStatus::Processing)?;
        self.review_store.save(&review).await?;

        let ctx = ReviewCtx::from_pair(&review, document);
        let start = Instant::now();

        // ========== 文本分析与查重并发执行 ==========
        let (analysis, plagiarism_check) = tokio::join!(
            self.flow.analyze_text(&document.text_content, &ctx),
            self.detect_plagiarism(&document.text_content, &ctx),
        );

        let processing_time_ms = start.elapsed().as_millis() as u64;

        // ========== 回填审阅结果 ==========
        review.scores = analysis.scores;
        review.overall_score = scoring::overall_score(&review.scores);
        review.set_issues(analysis.issues);
        review.summary.improvement_suggestions = analysis.improvement_suggestions;
        review.ai_analysis = AiAnalysis {
            model: analysis.metadata.model.clone(),
            processing_time_ms,
            confidence: analysis.metadata.confidence,
        };
        review.plagiarism_check = plagiarism_check;
        review.transition_to(ReviewStatus::Completed)?;
        self.review_store.save(&review).await?;

        // ========== 同步文档状态与元数据 ==========
        let mut document = document.clone();
        document.set_status(DocumentStatus::Completed);
        document.set_processing_metadata(ProcessingMetadata {
            processing_time_ms,
            model_used: analysis.metadata.model,
            confidence: analysis.metadata.confidence,
        });
        self.document_store.save(&document).await?;

        // ========== 更新用户滚动统计 ==========
        self.update_user_statistics(&document, review.overall_score)
            .await?;

        info!(
            "[审阅 #{}] ✅ 处理完成，总分 {}，耗时 {}ms",
            review_id, review.overall_score, processing_time_ms
        );

        Ok(())
    }

    /// 查重（阶段失败在此消化，退回默认结果）
    async fn detect_plagiarism(&self, input: &str, ctx: &ReviewCtx) -> PlagiarismCheck {
        match self.plagiarism.detect(input, ctx.language).await {
            Ok(check) => check,
            Err(e) => {
                warn!("{} ⚠️ 查重失败，使用兜底结果: {}", ctx, e);
                PlagiarismCheck::default()
            }
        }
    }

    async fn update_user_statistics(
        &self,
        document: &Document,
        overall_score: u8,
    ) -> anyhow::Result<()> {
        match self.user_store.get(document.user_id).await? {
            Some(mut user) => {
                user.record_review(overall_score);
                self.user_store.save(&user).await?;
                info!(
                    "用户 #{} 统计已更新: {} 次审阅，平均分 {:.1}",
                    user.id, user.statistics.reviews_received, user.statistics.average_score
                );
            }
            None => {
                warn!("用户 #{} 不存在，跳过统计更新", document.user_id);
            }
        }
        Ok(())
    }

    /// 尽力把审阅与文档标记为失败
    ///
    /// 记录失败状态时再出错只写日志，流水线边界不外抛。
    async fn mark_failed(&self, review_id: Uuid, document_id: Uuid) {
        match self.review_store.get(review_id).await {
            Ok(Some(mut review)) if !review.is_terminal() => {
                if review.transition_to(ReviewStatus::Failed).is_ok() {
                    if let Err(e) = self.review_store.save(&review).await {
                        error!("[审阅 #{}] 记录失败状态时出错: {}", review_id, e);
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("[审阅 #{}] 加载审阅记录失败: {}", review_id, e);
            }
        }

        match self.document_store.get(document_id).await {
            Ok(Some(mut document)) => {
                document.set_status(DocumentStatus::Failed);
                if let Err(e) = self.document_store.save(&document).await {
                    error!("文档 #{} 记录失败状态时出错: {}", document_id, e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!("文档 #{} 加载失败: {}", document_id, e);
            }
        }
    }
}
