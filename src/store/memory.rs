//! 内存存储实现
//!
//! 供演示程序和测试使用。每个存储持有一把互斥锁，
//! `insert_pending` 的查重和插入在同一次持锁中完成。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Result, ReviewError};
use crate::models::{Document, Review, User};
use crate::store::{DocumentStore, ReviewStore, UserStore};

/// 内存文档存储
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<Uuid, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        Ok(self.documents.lock().await.get(&id).cloned())
    }

    async fn save(&self, document: &Document) -> Result<()> {
        self.documents
            .lock()
            .await
            .insert(document.id, document.clone());
        Ok(())
    }
}

/// 内存审阅存储
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    reviews: Mutex<HashMap<Uuid, Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn get(&self, id: Uuid) -> Result<Option<Review>> {
        Ok(self.reviews.lock().await.get(&id).cloned())
    }

    async fn insert_pending(&self, review: &Review) -> Result<()> {
        let mut reviews = self.reviews.lock().await;

        // 查重与插入在同一次持锁中完成，关闭先查后插的竞态
        let has_active = reviews
            .values()
            .any(|r| r.document_id == review.document_id && !r.is_terminal());

        if has_active {
            return Err(ReviewError::AlreadyInProgress {
                document_id: review.document_id,
            }
            .into());
        }

        reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn save(&self, review: &Review) -> Result<()> {
        self.reviews.lock().await.insert(review.id, review.clone());
        Ok(())
    }

    async fn find_active_for_document(&self, document_id: Uuid) -> Result<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .await
            .values()
            .find(|r| r.document_id == document_id && !r.is_terminal())
            .cloned())
    }
}

/// 内存用户存储
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn save(&self, user: &User) -> Result<()> {
        self.users.lock().await.insert(user.id, user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ReviewStatus;

    #[tokio::test]
    async fn test_insert_pending_rejects_active_duplicate() {
        let store = InMemoryReviewStore::new();
        let document_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let first = Review::new(document_id, user_id);
        store.insert_pending(&first).await.unwrap();

        // pending 状态下拒绝
        let second = Review::new(document_id, user_id);
        let err = store.insert_pending(&second).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Review(ReviewError::AlreadyInProgress { .. })
        ));

        // processing 状态下同样拒绝
        let mut processing = first.clone();
        processing.transition_to(ReviewStatus::Processing).unwrap();
        store.save(&processing).await.unwrap();

        let third = Review::new(document_id, user_id);
        assert!(store.insert_pending(&third).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_pending_allows_after_terminal() {
        let store = InMemoryReviewStore::new();
        let document_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut first = Review::new(document_id, user_id);
        store.insert_pending(&first).await.unwrap();

        first.transition_to(ReviewStatus::Processing).unwrap();
        first.transition_to(ReviewStatus::Failed).unwrap();
        store.save(&first).await.unwrap();

        // 旧审阅进入终态后允许重新创建
        let second = Review::new(document_id, user_id);
        store.insert_pending(&second).await.unwrap();
    }

    #[tokio::test]
    async fn test_other_documents_are_independent() {
        let store = InMemoryReviewStore::new();
        let user_id = Uuid::new_v4();

        let first = Review::new(Uuid::new_v4(), user_id);
        let second = Review::new(Uuid::new_v4(), user_id);
        store.insert_pending(&first).await.unwrap();
        store.insert_pending(&second).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_active_for_document() {
        let store = InMemoryReviewStore::new();
        let document_id = Uuid::new_v4();

        assert!(store
            .find_active_for_document(document_id)
            .await
            .unwrap()
            .is_none());

        let review = Review::new(document_id, Uuid::new_v4());
        store.insert_pending(&review).await.unwrap();

        let active = store.find_active_for_document(document_id).await.unwrap();
        assert_eq!(active.map(|r| r.id), Some(review.id));
    }
}
