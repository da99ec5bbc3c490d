use serde::Deserialize;
use validator::Validate;

/// 등급 생성 요청
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradeRequest {
    #[validate(length(min = 1, max = 20, message = "등급 이름은 1~20자여야 합니다."))]
    pub name: String,

    #[validate(range(min = 0.0, max = 1.0, message = "최소 정답률은 0.0 ~ 1.0 사이여야 합니다."))]
    pub min_rate: f64,
}
