//! 应用程序错误类型
//!
//! 按领域划分错误枚举：审阅 / 存储 / LLM / 配置。
//! 编排层内部使用 anyhow 传播，对外契约处使用这里的类型化错误。

use thiserror::Error;
use uuid::Uuid;

use crate::models::review::ReviewStatus;

/// 应用程序错误
#[derive(Debug, Error)]
pub enum AppError {
    /// 审阅流程错误
    #[error("审阅错误: {0}")]
    Review(#[from] ReviewError),
    /// 存储层错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 审阅流程错误
#[derive(Debug, Error)]
pub enum ReviewError {
    /// 同一文档已存在未完成的审阅（单飞约束）
    #[error("文档 {document_id} 已有一个进行中的审阅")]
    AlreadyInProgress { document_id: Uuid },

    /// 审阅记录不存在
    #[error("审阅 {review_id} 不存在")]
    NotFound { review_id: Uuid },

    /// 文档不存在
    #[error("文档 {document_id} 不存在")]
    DocumentNotFound { document_id: Uuid },

    /// 非法的状态转换（终态不可再变）
    #[error("非法状态转换: {from:?} -> {to:?}")]
    InvalidTransition { from: ReviewStatus, to: ReviewStatus },

    /// 反馈评分超出 1-5 范围
    #[error("评分 {rating} 超出范围 [1, 5]")]
    InvalidRating { rating: u8 },

    /// 只有已完成的审阅才能接受反馈 / 标记问题已解决
    #[error("审阅 {review_id} 尚未完成，当前状态: {status:?}")]
    NotCompleted { review_id: Uuid, status: ReviewStatus },

    /// 问题索引超出范围
    #[error("问题索引 {index} 超出范围 [0, {max})")]
    IssueIndexOutOfRange { index: usize, max: usize },
}

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 后端存储操作失败
    #[error("存储操作失败: {0}")]
    Backend(String),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },

    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },

    /// 响应中找不到 JSON 对象
    #[error("LLM响应中未找到JSON对象")]
    JsonNotFound,

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("无法读取配置文件 {path}: {message}")]
    FileReadFailed { path: String, message: String },

    /// TOML 解析失败
    #[error("无法解析配置文件 {path}: {message}")]
    TomlParseFailed { path: String, message: String },
}

/// 应用程序结果类型
pub type Result<T, E = AppError> = std::result::Result<T, E>;
