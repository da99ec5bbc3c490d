//! 통합 테스트 공용 헬퍼
//!
//! 테스트마다 독립된 인메모리 SQLite DB를 만들고 스키마와 기준 데이터를 채웁니다.
#![allow(dead_code)]

use async_trait::async_trait;
use learning_core::config::{seed_reference_data, sync_schema, AppConfig};
use learning_core::domain::operation::dto::CreateOperationTypeRequest;
use learning_core::domain::operation::entity::operation_type;
use learning_core::domain::operation::service::OperationTypeService;
use learning_core::domain::phrase::dto::CreatePhraseRequest;
use learning_core::domain::phrase::service::PhraseService;
use learning_core::{AppState, CancelToken, IdentityProvider, TenantContext};
use sea_orm::{ConnectOptions, Database};

/// 고정된 사용자 ID를 돌려주는 인증 제공자
pub struct FixedIdentity(pub Option<String>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}

/// 인메모리 DB 기반 AppState
///
/// 커넥션이 하나뿐이어야 모든 호출이 같은 인메모리 DB를 봅니다.
pub async fn setup_state() -> AppState {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("in-memory sqlite should connect");
    sync_schema(&db).await.expect("schema sync should succeed");
    seed_reference_data(&db)
        .await
        .expect("reference data should be seeded");

    AppState::new(db, AppConfig::with_database_url("sqlite::memory:"))
}

pub async fn tenant(user_id: &str) -> TenantContext {
    TenantContext::resolve(&FixedIdentity(Some(user_id.to_string())))
        .await
        .expect("tenant should resolve")
}

pub async fn cancellable_tenant(user_id: &str, cancel: CancelToken) -> TenantContext {
    tenant(user_id).await.with_cancel(cancel)
}

pub async fn create_phrase(state: &AppState, ctx: &TenantContext, text: &str) -> i64 {
    PhraseService::create(
        state,
        ctx,
        CreatePhraseRequest {
            text: text.to_string(),
            meaning: format!("{}의 뜻", text),
            note: None,
            genre_ids: vec![],
        },
    )
    .await
    .expect("phrase should be created")
    .phrase_id
}

pub async fn create_operation(
    state: &AppState,
    ctx: &TenantContext,
    code: &str,
    daily_limit: i32,
) -> operation_type::Model {
    OperationTypeService::create(
        state,
        ctx.cancel(),
        CreateOperationTypeRequest {
            code: code.to_string(),
            name: format!("{} 작업", code),
            daily_limit,
        },
    )
    .await
    .expect("operation type should be created")
}
