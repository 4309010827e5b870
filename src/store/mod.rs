//! 存储边界
//!
//! 文档 / 审阅 / 用户记录的持久化是外部协作方，这里只定义流水线
//! 需要的窄接口。单飞约束（每份文档最多一条非终态审阅）由
//! [`ReviewStore::insert_pending`] 的有条件插入保证，而不是
//! 先查后插，避免并发创建时的竞态。

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Document, Review, User};

pub mod memory;

pub use memory::{InMemoryDocumentStore, InMemoryReviewStore, InMemoryUserStore};

/// 文档存储
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 按 ID 加载文档
    async fn get(&self, id: Uuid) -> Result<Option<Document>>;

    /// 保存文档（插入或覆盖）
    async fn save(&self, document: &Document) -> Result<()>;
}

/// 审阅存储
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// 按 ID 加载审阅
    async fn get(&self, id: Uuid) -> Result<Option<Review>>;

    /// 有条件插入一条待处理审阅
    ///
    /// 同一文档已存在 {pending, processing} 状态的审阅时拒绝，
    /// 返回 [`crate::error::ReviewError::AlreadyInProgress`]。
    /// 检查与插入必须在同一个临界区内完成。
    async fn insert_pending(&self, review: &Review) -> Result<()>;

    /// 保存审阅（覆盖）
    async fn save(&self, review: &Review) -> Result<()>;

    /// 查找某文档当前的非终态审阅
    async fn find_active_for_document(&self, document_id: Uuid) -> Result<Option<Review>>;
}

/// 用户存储
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 按 ID 加载用户
    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    /// 保存用户（插入或覆盖）
    async fn save(&self, user: &User) -> Result<()>;
}
