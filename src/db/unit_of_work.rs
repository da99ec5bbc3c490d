//! Unit of Work
//!
//! 커넥션/트랜잭션 수명을 관리합니다. 호출 형태는 두 가지입니다.
//!
//! - [`UnitOfWork::read`]: 트랜잭션 없이 읽기 전용 조회기만 제공
//! - [`UnitOfWork::write`]: 트랜잭션 하나를 열고, 작업이 성공하면 정확히 한 번 커밋
//!
//! 작업 중 에러나 취소가 발생하면 롤백하고 원래 에러를 돌려줍니다.
//!
//! ```ignore
//! let tenant = ctx.tenant_id().clone();
//! let id = uow
//!     .write("phrase.create", ctx.cancel(), move |repos| {
//!         Box::pin(async move {
//!             let saved = repos.phrases(&tenant).add(model).await?;
//!             Ok(saved.phrase_id)
//!         })
//!     })
//!     .await?;
//! ```

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, error, warn};

use super::repository_set::{ReadRepositories, RepositorySet};
use crate::utils::cancel::CancelToken;
use crate::utils::error::AppError;

/// 작업 클로저가 돌려주는 Future
pub type WorkFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'c>>;

#[derive(Debug, Clone)]
pub struct UnitOfWork {
    db: DatabaseConnection,
}

impl UnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 읽기 전용 작업 실행 (트랜잭션 없음)
    pub async fn read<T, F>(
        &self,
        operation: &'static str,
        cancel: &CancelToken,
        work: F,
    ) -> Result<T, AppError>
    where
        T: Send,
        F: for<'c> FnOnce(ReadRepositories<'c>) -> WorkFuture<'c, T> + Send,
    {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = work(ReadRepositories::new(&self.db)) => result,
        };

        if let Err(err) = &result {
            log_failure(operation, err, "read failed");
        }
        result
    }

    /// 쓰기 작업 실행
    ///
    /// `work`는 저장소를 통해 변경을 쌓기만 하고 커밋하지 않습니다.
    /// 커밋 지점은 이 함수 안의 단 한 곳입니다.
    pub async fn write<T, F>(
        &self,
        operation: &'static str,
        cancel: &CancelToken,
        work: F,
    ) -> Result<T, AppError>
    where
        T: Send,
        F: for<'c> FnOnce(RepositorySet<'c>) -> WorkFuture<'c, T> + Send,
    {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let txn = self.db.begin().await.map_err(|e| {
            error!(operation, error = %e, "failed to begin transaction");
            AppError::from(e)
        })?;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = work(RepositorySet::new(&txn)) => result,
        };

        match outcome {
            Ok(value) => {
                txn.commit().await.map_err(|e| {
                    error!(operation, error = %e, "commit failed");
                    AppError::from(e)
                })?;
                debug!(operation, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                log_failure(operation, &err, "rolling back transaction");
                if let Err(rollback_err) = txn.rollback().await {
                    // 롤백 실패는 기록만 하고 원래 에러를 돌려준다
                    error!(operation, error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

fn log_failure(operation: &'static str, err: &AppError, message: &'static str) {
    if err.is_internal() {
        error!(operation, code = %err.error_code(), error = %err, "{}", message);
    } else {
        warn!(operation, code = %err.error_code(), error = %err, "{}", message);
    }
}
