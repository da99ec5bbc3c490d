use sea_orm::{ColumnTrait, ConnectionTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use super::dto::CreateGradeRequest;
use super::entity::grade;
use super::resolver::GradeResolver;
use crate::db::Reader;
use crate::domain::test_result::entity::test_result;
use crate::state::AppState;
use crate::utils::cancel::CancelToken;
use crate::utils::error::AppError;
use crate::utils::response::DeleteOutcome;

/// 등급 기준 관리 (전역 카탈로그, 권한 확인은 호출 측 책임)
pub struct GradeService;

impl GradeService {
    /// 등급 목록 (기준 정답률 내림차순)
    pub async fn list(state: &AppState, cancel: &CancelToken) -> Result<Vec<grade::Model>, AppError> {
        state
            .uow
            .read("grade.list", cancel, |repos| {
                Box::pin(async move {
                    repos
                        .grades()
                        .all(|q| q.order_by_desc(grade::Column::MinRate))
                        .await
                })
            })
            .await
    }

    /// 등급 생성 (이름 중복 시 Conflict)
    pub async fn create(
        state: &AppState,
        cancel: &CancelToken,
        req: CreateGradeRequest,
    ) -> Result<grade::Model, AppError> {
        req.validate()?;

        state
            .uow
            .write("grade.create", cancel, move |repos| {
                Box::pin(async move {
                    let grades = repos.grades();

                    let name = req.name.clone();
                    if grades
                        .reader()
                        .count(move |q| q.filter(grade::Column::Name.eq(name)))
                        .await?
                        > 0
                    {
                        return Err(AppError::conflict(format!(
                            "이미 존재하는 등급입니다: {}",
                            req.name
                        )));
                    }

                    let saved = grades
                        .add(grade::ActiveModel {
                            name: Set(req.name),
                            min_rate: Set(req.min_rate),
                            ..Default::default()
                        })
                        .await?;

                    info!(grade = %saved.name, min_rate = saved.min_rate, "grade created");
                    Ok(saved)
                })
            })
            .await
    }

    /// 등급 삭제
    ///
    /// 시험 결과가 참조 중이면 삭제하지 않고 `InUse`를 돌려줍니다.
    pub async fn delete(
        state: &AppState,
        cancel: &CancelToken,
        grade_id: i64,
    ) -> Result<DeleteOutcome, AppError> {
        state
            .uow
            .write("grade.delete", cancel, move |repos| {
                Box::pin(async move {
                    let grades = repos.grades();
                    let existing = grades
                        .reader()
                        .get(grade_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("존재하지 않는 등급입니다."))?;

                    let references = repos
                        .result_history()
                        .count(move |q| q.filter(test_result::Column::GradeId.eq(grade_id)))
                        .await?;
                    if references > 0 {
                        return Ok(DeleteOutcome::InUse { references });
                    }

                    grades.delete(existing.into()).await?;
                    info!(grade_id, "grade deleted");
                    Ok(DeleteOutcome::Deleted)
                })
            })
            .await
    }

    /// 현재 기준 데이터로 만든 등급 변환기
    pub async fn resolver(state: &AppState, cancel: &CancelToken) -> Result<GradeResolver, AppError> {
        state
            .uow
            .read("grade.resolver", cancel, |repos| {
                Box::pin(async move { load_resolver(&repos.grades()).await })
            })
            .await
    }
}

/// 등급 기준 전체를 읽어 변환기 생성
pub(crate) async fn load_resolver<C>(
    reader: &Reader<'_, grade::Entity, C>,
) -> Result<GradeResolver, AppError>
where
    C: ConnectionTrait,
{
    let bands = reader.all(|q| q).await?;
    Ok(GradeResolver::new(bands))
}
