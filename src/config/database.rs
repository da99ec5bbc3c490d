use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Schema,
    Set, Statement,
};
use tracing::info;

use crate::domain::grade::entity::grade;
use crate::domain::operation::codes;
use crate::domain::operation::entity::{daily_usage, operation_type};
use crate::domain::phrase::entity::{genre, phrase, phrase_genre, phrase_image};
use crate::domain::test_result::entity::{test_result, test_result_detail};
use crate::utils::time::now_utc;

use super::AppConfig;

/// 기본 작업 유형 (코드, 이름, 일일 한도)
const DEFAULT_OPERATION_TYPES: [(&str, &str, i32); 2] = [
    (codes::IMAGE_GENERATION, "AI 이미지 생성", 10),
    (codes::DIARY_CORRECTION, "AI 일기 첨삭", 5),
];

/// 기본 등급 (이름, 최소 정답률)
const DEFAULT_GRADES: [(&str, f64); 4] = [("S", 0.9), ("A", 0.8), ("B", 0.6), ("C", 0.0)];

/// DB 연결 후, 설정에 따라 스키마 동기화와 기준 데이터 시딩을 수행합니다.
pub async fn establish_connection(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(&config.database_url).await?;
    info!("Successfully connected to the database.");

    if config.db_schema_update {
        sync_schema(&db).await?;
        seed_reference_data(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

/// 테이블과 인덱스 생성 (이미 있으면 건너뜀)
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    info!("Starting database schema synchronization...");

    // 외래 키 순서대로 (부모 먼저)

    // 1. 기준 데이터
    create_table_if_not_exists(db, &schema, operation_type::Entity).await?;
    create_table_if_not_exists(db, &schema, grade::Entity).await?;

    // 2. 사용자 소유 데이터
    create_table_if_not_exists(db, &schema, genre::Entity).await?;
    create_table_if_not_exists(db, &schema, phrase::Entity).await?;
    create_table_if_not_exists(db, &schema, phrase_image::Entity).await?;
    create_table_if_not_exists(db, &schema, phrase_genre::Entity).await?;

    // 3. 사용량 / 시험 결과
    create_table_if_not_exists(db, &schema, daily_usage::Entity).await?;
    create_table_if_not_exists(db, &schema, test_result::Entity).await?;
    create_table_if_not_exists(db, &schema, test_result_detail::Entity).await?;

    // 테넌트별 조회 인덱스
    create_index_if_not_exists(db, "idx_phrases_tenant_created", "phrases", &["tenant_id", "created_at"]).await?;
    create_index_if_not_exists(db, "idx_phrase_images_phrase", "phrase_images", &["phrase_id"]).await?;
    create_index_if_not_exists(db, "idx_genres_tenant", "genres", &["tenant_id"]).await?;
    create_index_if_not_exists(db, "idx_test_results_tenant_taken", "test_results", &["tenant_id", "taken_at"]).await?;
    create_index_if_not_exists(db, "idx_daily_usages_operation", "daily_usages", &["operation_type_id"]).await?;
    create_unique_index_if_not_exists(db, "uq_genres_tenant_name", "genres", &["tenant_id", "name"]).await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

/// 카탈로그가 비어 있을 때만 기본 작업 유형과 등급을 넣습니다.
pub async fn seed_reference_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = now_utc();

    if operation_type::Entity::find().count(db).await? == 0 {
        let rows = DEFAULT_OPERATION_TYPES
            .iter()
            .map(|(code, name, daily_limit)| operation_type::ActiveModel {
                code: Set(code.to_string()),
                name: Set(name.to_string()),
                daily_limit: Set(*daily_limit),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
        operation_type::Entity::insert_many(rows).exec(db).await?;
        info!(count = DEFAULT_OPERATION_TYPES.len(), "seeded operation types");
    }

    if grade::Entity::find().count(db).await? == 0 {
        let rows = DEFAULT_GRADES.iter().map(|(name, min_rate)| grade::ActiveModel {
            name: Set(name.to_string()),
            min_rate: Set(*min_rate),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });
        grade::Entity::insert_many(rows).exec(db).await?;
        info!(count = DEFAULT_GRADES.len(), "seeded grades");
    }

    Ok(())
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    db.execute(create_stmt).await.map(|_| ()).map_err(|e| {
        tracing::error!(table = %entity.table_name(), "Failed to create table: {}", e);
        e
    })
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    create_index(db, "CREATE INDEX", index_name, table_name, columns).await
}

async fn create_unique_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    create_index(db, "CREATE UNIQUE INDEX", index_name, table_name, columns).await
}

async fn create_index(
    db: &DatabaseConnection,
    verb: &str,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let sql = format!(
        "{} {} ON {} ({})",
        verb,
        index_name,
        table_name,
        columns.join(", ")
    );
    let stmt = Statement::from_string(db.get_database_backend(), sql);

    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            // 이미 존재하는 인덱스는 무시
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("duplicate") || err_str.contains("exists") {
                Ok(())
            } else {
                tracing::error!("Failed to create index {}: {}", index_name, e);
                Err(e)
            }
        }
    }
}
