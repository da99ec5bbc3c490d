use std::env;

use chrono::FixedOffset;

use crate::utils::time::{kst, offset_from_hours};

/// 기본 업무 타임존 (KST, UTC+9)
const DEFAULT_BUSINESS_OFFSET_HOURS: i32 = 9;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// 시작 시 스키마 동기화 및 기준 데이터 시딩 여부
    pub db_schema_update: bool,
    /// 일일 사용량 날짜 계산에 쓰는 업무 타임존 (UTC 기준 시간)
    pub business_utc_offset_hours: i32,
    pub log_dir: String,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let db_schema_update = env::var("DB_SCHEMA_UPDATE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid DB_SCHEMA_UPDATE value, defaulting to false. Use 'true' or 'false'."
                );
                false
            });

        let business_utc_offset_hours = match env::var("BUSINESS_UTC_OFFSET_HOURS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidOffset)?,
            Err(_) => DEFAULT_BUSINESS_OFFSET_HOURS,
        };
        if offset_from_hours(business_utc_offset_hours).is_none() {
            return Err(ConfigError::InvalidOffset);
        }

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Ok(Self {
            database_url,
            db_schema_update,
            business_utc_offset_hours,
            log_dir,
        })
    }

    /// 테스트 및 임베디드 사용을 위한 기본값 기반 설정
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_schema_update: true,
            business_utc_offset_hours: DEFAULT_BUSINESS_OFFSET_HOURS,
            log_dir: "logs".to_string(),
        }
    }

    pub fn business_offset(&self) -> FixedOffset {
        offset_from_hours(self.business_utc_offset_hours).unwrap_or_else(kst)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
    #[error("BUSINESS_UTC_OFFSET_HOURS must be an integer between -23 and 23")]
    InvalidOffset,
}
