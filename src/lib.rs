//! # Review Pipeline
//!
//! 学术写作平台的审阅处理流水线：把一份文档的纯文本内容
//! 变成一条结构化、带评分的审阅记录。
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - LLM API 客户端，只暴露 `TextGenerator` 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理文本到分析值的映射
//! - `GrammarAnalyzer` - 语法/拼写分析（外部 LLM，失败兜底）
//! - `StyleAnalyzer` / `CoherenceAnalyzer` / `CitationAnalyzer` - 本地启发式
//! - `PlagiarismDetector` - 查重能力（可替换实现）
//! - `scoring` - 固定权重的得分聚合
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次文本分析"的完整流程
//! - `ReviewCtx` - 上下文封装（审阅/文档/用户 + 语言与引用格式）
//! - `ReviewFlow` - 流程编排（四个子分析器并发 → 合并结果）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/ReviewProcessor` - 审阅状态机驱动器：创建（单飞
//!   校验）、后台调度、结果回写、文档与用户统计同步、失败兜底
//!
//! ### 存储边界（Store）
//! - `store/` - 文档/审阅/用户存储的窄接口 + 内存实现
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{LlmClient, TextGenerator};
pub use config::Config;
pub use error::{AppError, Result, ReviewError};
pub use models::{Document, Review, ReviewStatus};
pub use orchestrator::ReviewProcessor;
pub use workflow::{AnalysisResult, ReviewCtx, ReviewFlow};
