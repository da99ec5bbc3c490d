use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{test_result, test_result_detail};

/// 채점 결과 한 줄 (시험 화면 세션에서 전달)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRow {
    pub is_correct: bool,
}

/// 출제된 카드 한 장 (시험 화면 세션에서 전달)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizCard {
    /// 문장 ID. 세션 복원 과정에서 비어 있을 수 있습니다.
    pub item_id: Option<i64>,
}

impl QuizCard {
    /// 유효한 문장 ID (없거나 0 이하면 None)
    pub fn phrase_id(&self) -> Option<i64> {
        self.item_id.filter(|id| *id > 0)
    }
}

/// 시험 결과 목록 항목
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultSummary {
    pub test_result_id: Uuid,
    pub taken_at: NaiveDateTime,
    pub grade_id: i64,
    pub correct_count: i32,
    pub total_count: i32,
}

impl From<test_result::Model> for TestResultSummary {
    fn from(model: test_result::Model) -> Self {
        Self {
            test_result_id: model.test_result_id,
            taken_at: model.taken_at,
            grade_id: model.grade_id,
            correct_count: model.correct_count,
            total_count: model.total_count,
        }
    }
}

/// 문항별 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultLine {
    pub seq_no: i32,
    pub phrase_id: i64,
    pub is_correct: bool,
}

impl From<test_result_detail::Model> for TestResultLine {
    fn from(model: test_result_detail::Model) -> Self {
        Self {
            seq_no: model.seq_no,
            phrase_id: model.phrase_id,
            is_correct: model.is_correct,
        }
    }
}

/// 시험 결과 상세 (헤더 + 순번 순 상세)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultDetailResponse {
    #[serde(flatten)]
    pub summary: TestResultSummary,
    pub grade_name: String,
    pub lines: Vec<TestResultLine>,
}
