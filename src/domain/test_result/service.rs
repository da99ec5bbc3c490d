use std::collections::BTreeSet;

use sea_orm::{ColumnTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{AnswerRow, QuizCard, TestResultDetailResponse, TestResultLine, TestResultSummary};
use super::entity::{test_result, test_result_detail};
use crate::domain::grade::service::load_resolver;
use crate::domain::phrase::entity::phrase;
use crate::state::AppState;
use crate::tenant::TenantContext;
use crate::utils::error::AppError;
use crate::utils::time::now_utc;

/// 기록할 상세 한 줄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DetailLine {
    seq_no: i32,
    phrase_id: i64,
    is_correct: bool,
}

pub struct TestResultService;

impl TestResultService {
    /// 시험 결과 저장
    ///
    /// 채점 결과와 카드를 같은 위치끼리 묶어 헤더 1행과 상세 N행을 한 트랜잭션으로
    /// 기록합니다. 문장 ID가 빈 카드는 건너뛰며, 기록된 상세가 하나도 없으면
    /// 헤더까지 모두 롤백됩니다.
    pub async fn save(
        state: &AppState,
        ctx: &TenantContext,
        result_rows: Vec<AnswerRow>,
        cards: Vec<QuizCard>,
    ) -> Result<Uuid, AppError> {
        // 1. 채점 결과 확인
        if result_rows.is_empty() {
            return Err(AppError::bad_request("채점 결과가 비어 있습니다."));
        }

        let total = result_rows.len();
        let correct = result_rows.iter().filter(|row| row.is_correct).count();
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .write("test_result.save", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    // 2. 등급 결정
                    let resolver = load_resolver(&repos.grades().reader()).await?;
                    let grade_id = resolver.resolve_counts(correct, total)?.grade_id;

                    // 3~4. 헤더 기록
                    let test_result_id = Uuid::new_v4();
                    repos
                        .test_results(&tenant)
                        .add(test_result::ActiveModel {
                            test_result_id: Set(test_result_id),
                            taken_at: Set(now_utc()),
                            grade_id: Set(grade_id),
                            correct_count: Set(to_i32(correct)?),
                            total_count: Set(to_i32(total)?),
                            is_completed: Set(true),
                            ..Default::default()
                        })
                        .await?;

                    // 5. 위치별 정렬
                    let lines = align(&result_rows, &cards);
                    for position in skipped_positions(&result_rows, &cards) {
                        warn!(
                            tenant = %tenant,
                            %test_result_id,
                            position,
                            "skipping quiz card without phrase id"
                        );
                    }

                    // 6. 상세가 없으면 전체 롤백
                    if lines.is_empty() {
                        return Err(AppError::invariant(
                            "저장할 문항이 없습니다. 시험 결과를 기록하지 않았습니다.",
                        ));
                    }

                    // 7. 다른 사용자의 문장을 참조하지 않는지 확인 후 상세 기록
                    let phrase_ids: BTreeSet<i64> = lines.iter().map(|line| line.phrase_id).collect();
                    let expected = phrase_ids.len() as u64;
                    let owned = repos
                        .phrases(&tenant)
                        .reader()
                        .count(move |q| q.filter(phrase::Column::PhraseId.is_in(phrase_ids)))
                        .await?;
                    if owned != expected {
                        return Err(AppError::not_found("존재하지 않는 문장이 포함되어 있습니다."));
                    }

                    let written = lines.len();
                    repos
                        .test_result_details(&tenant)
                        .add_range(lines.into_iter().map(|line| test_result_detail::ActiveModel {
                            test_result_id: Set(test_result_id),
                            seq_no: Set(line.seq_no),
                            phrase_id: Set(line.phrase_id),
                            is_correct: Set(line.is_correct),
                            ..Default::default()
                        }))
                        .await?;

                    info!(
                        tenant = %tenant,
                        %test_result_id,
                        grade_id,
                        correct,
                        total,
                        written,
                        "test result saved"
                    );

                    // 8.
                    Ok(test_result_id)
                })
            })
            .await
    }

    /// 시험 이력 (최신순)
    pub async fn list(
        state: &AppState,
        ctx: &TenantContext,
    ) -> Result<Vec<TestResultSummary>, AppError> {
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .read("test_result.list", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let rows = repos
                        .test_results(&tenant)
                        .all(|q| q.order_by_desc(test_result::Column::TakenAt))
                        .await?;
                    Ok(rows.into_iter().map(TestResultSummary::from).collect())
                })
            })
            .await
    }

    /// 시험 결과 상세
    pub async fn get(
        state: &AppState,
        ctx: &TenantContext,
        test_result_id: Uuid,
    ) -> Result<TestResultDetailResponse, AppError> {
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .read("test_result.get", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let header = repos
                        .test_results(&tenant)
                        .get(test_result_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("존재하지 않는 시험 결과입니다."))?;

                    let lines = repos
                        .test_result_details(&tenant)
                        .all(move |q| {
                            q.filter(test_result_detail::Column::TestResultId.eq(test_result_id))
                                .order_by_asc(test_result_detail::Column::SeqNo)
                        })
                        .await?;

                    let grade_name = repos
                        .grades()
                        .get(header.grade_id)
                        .await?
                        .map(|grade| grade.name)
                        .unwrap_or_default();

                    Ok(TestResultDetailResponse {
                        summary: header.into(),
                        grade_name,
                        lines: lines.into_iter().map(TestResultLine::from).collect(),
                    })
                })
            })
            .await
    }
}

/// 위치별로 묶어 기록할 상세를 만듭니다.
///
/// 순번은 실제로 기록되는 행 기준으로 1부터 빈틈 없이 매겨집니다.
fn align(result_rows: &[AnswerRow], cards: &[QuizCard]) -> Vec<DetailLine> {
    result_rows
        .iter()
        .zip(cards)
        .filter_map(|(row, card)| card.phrase_id().map(|phrase_id| (phrase_id, row.is_correct)))
        .enumerate()
        .map(|(written, (phrase_id, is_correct))| DetailLine {
            seq_no: written as i32 + 1,
            phrase_id,
            is_correct,
        })
        .collect()
}

/// 문장 ID가 없어 건너뛴 원본 위치 (0부터)
fn skipped_positions(result_rows: &[AnswerRow], cards: &[QuizCard]) -> Vec<usize> {
    result_rows
        .iter()
        .zip(cards)
        .enumerate()
        .filter(|(_, (_, card))| card.phrase_id().is_none())
        .map(|(position, _)| position)
        .collect()
}

fn to_i32(count: usize) -> Result<i32, AppError> {
    i32::try_from(count).map_err(|_| AppError::bad_request("문항 수가 너무 많습니다."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[bool]) -> Vec<AnswerRow> {
        values.iter().map(|&is_correct| AnswerRow { is_correct }).collect()
    }

    fn cards(ids: &[Option<i64>]) -> Vec<QuizCard> {
        ids.iter().map(|&item_id| QuizCard { item_id }).collect()
    }

    #[test]
    fn should_align_by_position() {
        let lines = align(
            &rows(&[true, false, true]),
            &cards(&[Some(11), Some(12), Some(13)]),
        );

        assert_eq!(
            lines,
            vec![
                DetailLine { seq_no: 1, phrase_id: 11, is_correct: true },
                DetailLine { seq_no: 2, phrase_id: 12, is_correct: false },
                DetailLine { seq_no: 3, phrase_id: 13, is_correct: true },
            ]
        );
    }

    #[test]
    fn dropped_cards_should_not_leave_sequence_gaps() {
        let result = rows(&[true, false, true]);
        let deck = cards(&[Some(11), None, Some(13)]);

        let lines = align(&result, &deck);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].seq_no, 1);
        assert_eq!(lines[1].seq_no, 2);
        assert_eq!(lines[1].phrase_id, 13);
        assert!(lines[1].is_correct);
        assert_eq!(skipped_positions(&result, &deck), vec![1]);
    }

    #[test]
    fn should_stop_at_shorter_list() {
        let lines = align(&rows(&[true, true, true]), &cards(&[Some(1), Some(2)]));

        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn non_positive_ids_should_count_as_missing() {
        let lines = align(&rows(&[true, true]), &cards(&[Some(0), Some(-3)]));

        assert!(lines.is_empty());
    }
}
