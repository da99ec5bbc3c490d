use sea_orm::{ColumnTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use super::dto::CreateOperationTypeRequest;
use super::entity::{daily_usage, operation_type};
use crate::state::AppState;
use crate::utils::cancel::CancelToken;
use crate::utils::error::AppError;
use crate::utils::response::DeleteOutcome;

/// 작업 유형 카탈로그 관리
///
/// 카탈로그는 모든 사용자가 공유하는 전역 데이터라 테넌트를 받지 않습니다.
/// 관리자 권한 확인은 호출하는 쪽의 책임입니다.
pub struct OperationTypeService;

impl OperationTypeService {
    /// 전체 작업 유형 (코드 순)
    pub async fn list(
        state: &AppState,
        cancel: &CancelToken,
    ) -> Result<Vec<operation_type::Model>, AppError> {
        state
            .uow
            .read("operation_type.list", cancel, |repos| {
                Box::pin(async move {
                    repos
                        .operation_types()
                        .all(|q| q.order_by_asc(operation_type::Column::Code))
                        .await
                })
            })
            .await
    }

    /// 작업 유형 생성 (코드 중복 시 Conflict)
    pub async fn create(
        state: &AppState,
        cancel: &CancelToken,
        req: CreateOperationTypeRequest,
    ) -> Result<operation_type::Model, AppError> {
        req.validate()?;

        state
            .uow
            .write("operation_type.create", cancel, move |repos| {
                Box::pin(async move {
                    let types = repos.operation_types();

                    let code = req.code.clone();
                    let duplicated = types
                        .reader()
                        .count(move |q| q.filter(operation_type::Column::Code.eq(code)))
                        .await?;
                    if duplicated > 0 {
                        return Err(AppError::conflict(format!(
                            "이미 등록된 작업 코드입니다: {}",
                            req.code
                        )));
                    }

                    let saved = types
                        .add(operation_type::ActiveModel {
                            code: Set(req.code),
                            name: Set(req.name),
                            daily_limit: Set(req.daily_limit),
                            ..Default::default()
                        })
                        .await?;

                    info!(code = %saved.code, daily_limit = saved.daily_limit, "operation type created");
                    Ok(saved)
                })
            })
            .await
    }

    /// 일일 한도 변경 (0 이하면 무제한)
    pub async fn update_limit(
        state: &AppState,
        cancel: &CancelToken,
        operation_type_id: i64,
        daily_limit: i32,
    ) -> Result<operation_type::Model, AppError> {
        state
            .uow
            .write("operation_type.update_limit", cancel, move |repos| {
                Box::pin(async move {
                    let types = repos.operation_types();
                    let existing = types
                        .reader()
                        .get(operation_type_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("존재하지 않는 작업 유형입니다."))?;

                    let mut model: operation_type::ActiveModel = existing.into();
                    model.daily_limit = Set(daily_limit);
                    types.update(model).await
                })
            })
            .await
    }

    /// 작업 유형 삭제
    ///
    /// 사용량 기록이 하나라도 참조하면 삭제하지 않고 `InUse`를 돌려줍니다.
    pub async fn delete(
        state: &AppState,
        cancel: &CancelToken,
        operation_type_id: i64,
    ) -> Result<DeleteOutcome, AppError> {
        state
            .uow
            .write("operation_type.delete", cancel, move |repos| {
                Box::pin(async move {
                    let types = repos.operation_types();
                    let existing = types
                        .reader()
                        .get(operation_type_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("존재하지 않는 작업 유형입니다."))?;

                    // 사용량 기록은 테넌트와 무관하게 전부 센다
                    let references = repos
                        .usage_history()
                        .count(move |q| {
                            q.filter(daily_usage::Column::OperationTypeId.eq(operation_type_id))
                        })
                        .await?;
                    if references > 0 {
                        return Ok(DeleteOutcome::InUse { references });
                    }

                    types.delete(existing.into()).await?;
                    info!(operation_type_id, "operation type deleted");
                    Ok(DeleteOutcome::Deleted)
                })
            })
            .await
    }
}
