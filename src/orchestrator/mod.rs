//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层驱动审阅的完整生命周期，是整个流水线的"指挥中心"。
//!
//! ### `review_processor` - 审阅流水线控制器
//! - 创建审阅（单飞校验）并调度后台流水线
//! - 推进状态机 pending → processing → {completed, failed}
//! - 并发调用文本分析编排器与查重模块
//! - 回写审阅结果、文档状态与用户统计
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::ReviewProcessor (一条审阅的生命周期)
//!     ↓
//! workflow::ReviewFlow (一次文本分析)
//!     ↓
//! services (能力层：grammar / style / coherence / citation / plagiarism)
//!     ↓
//! clients (基础设施：LlmClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：控制器只做状态推进和结果回写，不做具体分析
//! 2. **向下依赖**：编排层 → workflow → services → clients
//! 3. **边界兜底**：后台任务顶层永不外抛，失败转化为终态与日志

pub mod review_processor;

// 重新导出主要类型
pub use review_processor::ReviewProcessor;
