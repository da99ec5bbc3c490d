use serde::{Deserialize, Serialize};
use validator::Validate;

/// 남은 사용 가능 단위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "units")]
pub enum Remaining {
    Unlimited,
    Units(i32),
}

/// 사용량 확인 결과
///
/// 한도 초과는 에러가 아니라 `allowed = false`인 정상 결과입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationCheck {
    pub allowed: bool,
    pub remaining: Remaining,
    pub message: String,
}

impl OperationCheck {
    pub fn unlimited() -> Self {
        Self {
            allowed: true,
            remaining: Remaining::Unlimited,
            message: "사용량 제한이 없는 작업입니다.".to_string(),
        }
    }

    pub fn unknown_operation(code: &str) -> Self {
        Self {
            allowed: false,
            remaining: Remaining::Units(0),
            message: format!("등록되지 않은 작업 유형입니다: {}", code),
        }
    }

    /// 한도 `cap`, 사용량 `used`에서 `units`를 요청한 결과
    pub fn evaluate(cap: i32, used: i32, units: i32) -> Self {
        let available = cap - used;
        if available >= units {
            Self {
                allowed: true,
                remaining: Remaining::Units(available - units),
                message: format!("오늘 {}회 더 사용할 수 있습니다.", available - units),
            }
        } else {
            Self::exceeded(cap)
        }
    }

    pub fn exceeded(cap: i32) -> Self {
        Self {
            allowed: false,
            remaining: Remaining::Units(0),
            message: format!("오늘 사용 가능한 횟수({}회)를 모두 사용했습니다.", cap),
        }
    }
}

/// 사용량 제한이 걸린 작업의 실행 결과
#[derive(Debug)]
pub enum Gated<T> {
    /// 작업이 실행되어 성공했고 사용량이 기록됨
    Completed(T),
    /// 한도 초과 등으로 작업을 실행하지 않음
    Denied(OperationCheck),
}

impl<T> Gated<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Gated::Completed(_))
    }
}

/// 작업 유형 생성 요청
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationTypeRequest {
    #[validate(length(min = 1, max = 50, message = "작업 코드는 1~50자여야 합니다."))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "작업 이름은 1~100자여야 합니다."))]
    pub name: String,

    /// 0 이하면 무제한
    pub daily_limit: i32,
}
