use serde::Serialize;
use tracing::{error, warn};

use super::error::AppError;

/// 처리 결과 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Success,
    /// 요청은 정상 처리되었지만 아무것도 변경되지 않은 경우 (예: 참조 중이라 삭제 거부)
    Warning,
    Failure,
}

/// 페이지 서비스에 돌려주는 공통 결과 구조체
///
/// 형식:
/// ```json
/// {
///   "isSuccess": true,
///   "status": "SUCCESS",
///   "code": "COMMON200",
///   "message": "성공입니다.",
///   "result": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T: Serialize> {
    pub is_success: bool,
    pub status: ResultStatus,
    pub code: String,
    pub message: String,
    pub result: Option<T>,
}

impl<T: Serialize> BaseResponse<T> {
    /// 성공 응답 생성
    pub fn success(result: T) -> Self {
        Self::success_with_message(result, "성공입니다.")
    }

    pub fn success_with_message(result: T, message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            status: ResultStatus::Success,
            code: "COMMON200".to_string(),
            message: message.into(),
            result: Some(result),
        }
    }

    /// 경고 응답 생성 (실패는 아니지만 요청이 반영되지 않음)
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            status: ResultStatus::Warning,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }

    /// 에러 응답 생성
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            status: ResultStatus::Failure,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }
}

impl<T: Serialize> From<AppError> for BaseResponse<T> {
    fn from(err: AppError) -> Self {
        let code = err.error_code();
        let message = err.message();

        // 에러 로깅
        if err.is_internal() {
            error!(code = %code, detail = %err, "Internal error");
        } else {
            warn!(code = %code, message = %message, "Request failed");
        }

        BaseResponse::error(code, message)
    }
}

impl<T: Serialize> From<Result<T, AppError>> for BaseResponse<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => BaseResponse::success(value),
            Err(err) => err.into(),
        }
    }
}

/// 참조 검사가 있는 삭제의 결과
///
/// 다른 데이터가 참조 중이면 에러 대신 `InUse`를 돌려주고 아무것도 지우지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum DeleteOutcome {
    Deleted,
    InUse { references: u64 },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

impl From<DeleteOutcome> for BaseResponse<DeleteOutcome> {
    fn from(outcome: DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Deleted => {
                BaseResponse::success_with_message(outcome, "삭제되었습니다.")
            }
            DeleteOutcome::InUse { references } => {
                warn!(references, "delete refused: row is still referenced");
                BaseResponse {
                    result: Some(outcome),
                    ..BaseResponse::warning(
                        "COMMON409",
                        format!(
                            "사용 중인 데이터라 삭제할 수 없습니다. (참조 {}건)",
                            references
                        ),
                    )
                }
            }
        }
    }
}
