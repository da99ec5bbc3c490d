use learning_core::config::{establish_connection, AppConfig};
use learning_core::utils::logging::init_logging;
use learning_core::AppState;

#[tokio::main]
async fn main() {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // 3. 로깅 초기화 (guard는 종료 시까지 유지)
    let _guard = init_logging(&config.log_dir);

    // 4. DB 연결 및 스키마 동기화
    let db = match establish_connection(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to the database");
            std::process::exit(1);
        }
    };

    let state = AppState::new(db, config);
    tracing::info!(
        business_utc_offset_hours = state.config.business_utc_offset_hours,
        "learning core is ready"
    );
}
