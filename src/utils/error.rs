use sea_orm::{DbErr, SqlErr};
use tracing::warn;

/// 애플리케이션 전역 에러 타입
///
/// 저장소(sea-orm) 에러는 Unit of Work 경계에서 이 타입으로 변환되며,
/// 호출자는 원본 DB 에러를 직접 보지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// 트랜잭션 내부에서 불변식이 깨진 경우 (전체 롤백 대상)
    #[error("{0}")]
    InvariantViolation(String),
    #[error("요청이 취소되었습니다.")]
    Cancelled,
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// 에러 메시지 반환
    ///
    /// 내부 에러의 상세 내용은 로그로만 남기고 사용자에게는 일반 메시지를 돌려줍니다.
    pub fn message(&self) -> String {
        match self {
            AppError::InternalError(_) => {
                "서버 내부 에러, 관리자에게 문의 바랍니다.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// 에러 코드 반환
    pub fn error_code(&self) -> String {
        match self {
            AppError::BadRequest(_) => "COMMON400",
            AppError::Unauthorized(_) => "AUTH4001",
            AppError::NotFound(_) => "COMMON404",
            AppError::Conflict(_) => "COMMON409",
            AppError::InvariantViolation(_) => "COMMON422",
            AppError::Cancelled => "COMMON499",
            AppError::InternalError(_) => "COMMON500",
        }
        .to_string()
    }

    /// 운영 로그에서 error 레벨로 남겨야 하는 에러인지 여부
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::InternalError(_))
    }
}

/// 편의 함수들
impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        AppError::InvariantViolation(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        AppError::InternalError(msg.into())
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                warn!(detail = %detail, "unique constraint violation");
                AppError::Conflict("이미 존재하는 데이터입니다.".to_string())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                warn!(detail = %detail, "foreign key constraint violation");
                AppError::Conflict("다른 데이터가 참조하고 있어 처리할 수 없습니다.".to_string())
            }
            _ => AppError::InternalError(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // 첫 번째 필드 에러의 메시지를 사용자 메시지로 사용
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "잘못된 요청입니다.".to_string());
        AppError::BadRequest(message)
    }
}
