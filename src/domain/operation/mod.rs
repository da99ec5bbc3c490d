pub mod dto;
pub mod entity;
pub mod limiter;
pub mod service;
mod usage_repo;

/// 기본 제공 작업 코드
pub mod codes {
    /// AI 이미지 생성
    pub const IMAGE_GENERATION: &str = "IMAGE_GENERATION";
    /// AI 일기 첨삭
    pub const DIARY_CORRECTION: &str = "DIARY_CORRECTION";
}
