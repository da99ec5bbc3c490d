//! 일일 사용량 카운터 갱신
//!
//! 카운터는 DB 쪽 `counter = counter + units` 한 문장으로만 증가시킵니다.
//! 애플리케이션에서 읽고-더하고-쓰는 방식은 사용하지 않습니다.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Insert, QueryFilter, Set};

use super::entity::daily_usage;
use crate::db::{TenantOwned, TenantRepository, Timestamped};
use crate::tenant::TenantId;
use crate::utils::error::AppError;
use crate::utils::time::now_utc;

type UsageKey = (String, i64, chrono::NaiveDate);

impl<'c, C> TenantRepository<'c, daily_usage::Entity, C>
where
    C: ConnectionTrait,
{
    fn key(&self, operation_type_id: i64, date: chrono::NaiveDate) -> UsageKey {
        (self.tenant().to_string(), operation_type_id, date)
    }

    /// 현재 카운터 (행이 없으면 0)
    pub async fn counter(&self, operation_type_id: i64, date: chrono::NaiveDate) -> Result<i32, AppError> {
        let row = self.reader().get(self.key(operation_type_id, date)).await?;
        Ok(row.map(|r| r.counter).unwrap_or(0))
    }

    /// 무조건 `units`만큼 증가시키고 증가 후 값을 돌려줍니다. 행이 없으면 생성합니다.
    pub async fn increment(
        &self,
        operation_type_id: i64,
        date: chrono::NaiveDate,
        units: i32,
    ) -> Result<i32, AppError> {
        if self.add_to_counter(operation_type_id, date, units, None).await? == 0 {
            // 최초 사용: 행을 보장한 뒤 같은 증가 문장을 다시 실행
            self.ensure_counter(operation_type_id, date).await?;
            self.add_to_counter(operation_type_id, date, units, None).await?;
        }
        self.counter(operation_type_id, date).await
    }

    /// `counter + units <= cap`일 때만 증가시킵니다. 증가했으면 true.
    pub async fn try_increment(
        &self,
        operation_type_id: i64,
        date: chrono::NaiveDate,
        units: i32,
        cap: i32,
    ) -> Result<bool, AppError> {
        if units > cap {
            return Ok(false);
        }

        if self
            .add_to_counter(operation_type_id, date, units, Some(cap))
            .await?
            > 0
        {
            return Ok(true);
        }

        if self.reader().get(self.key(operation_type_id, date)).await?.is_some() {
            // 행은 있지만 한도를 넘는 경우
            return Ok(false);
        }

        self.ensure_counter(operation_type_id, date).await?;
        Ok(self
            .add_to_counter(operation_type_id, date, units, Some(cap))
            .await?
            > 0)
    }

    /// 카운터 행이 없으면 0으로 만듭니다. 이미 있으면 그대로 둡니다.
    ///
    /// 동시에 같은 행을 만드는 요청이 있어도 실패하지 않습니다. MySQL은 중복 시
    /// 영향 행 수를 일정하게 돌려주지 않으므로 결과 행 수는 보지 않습니다.
    pub async fn ensure_counter(
        &self,
        operation_type_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<(), AppError> {
        counter_row_insert(self.tenant(), operation_type_id, date, now_utc())
            .exec_without_returning(self.conn())
            .await?;
        Ok(())
    }

    async fn add_to_counter(
        &self,
        operation_type_id: i64,
        date: chrono::NaiveDate,
        units: i32,
        cap: Option<i32>,
    ) -> Result<u64, AppError> {
        let mut update = daily_usage::Entity::update_many()
            .col_expr(
                daily_usage::Column::Counter,
                Expr::col(daily_usage::Column::Counter).add(units),
            )
            .col_expr(daily_usage::Column::UpdatedAt, Expr::value(now_utc()))
            .filter(daily_usage::Entity::scope(self.tenant()))
            .filter(daily_usage::Column::OperationTypeId.eq(operation_type_id))
            .filter(daily_usage::Column::UsageDate.eq(date));

        if let Some(cap) = cap {
            update = update.filter(daily_usage::Column::Counter.lte(cap - units));
        }

        let result = update.exec(self.conn()).await?;
        Ok(result.rows_affected)
    }
}

/// 0으로 시작하는 카운터 행 삽입문. 키가 겹치면 아무것도 바꾸지 않습니다.
///
/// MySQL에서는 `ON DUPLICATE KEY UPDATE tenant_id = tenant_id`, SQLite/Postgres에서는
/// `ON CONFLICT (...) DO NOTHING`으로 렌더링됩니다.
fn counter_row_insert(
    tenant: &TenantId,
    operation_type_id: i64,
    date: chrono::NaiveDate,
    now: chrono::NaiveDateTime,
) -> Insert<daily_usage::ActiveModel> {
    let mut model = daily_usage::ActiveModel {
        operation_type_id: Set(operation_type_id),
        usage_date: Set(date),
        counter: Set(0),
        ..Default::default()
    };
    daily_usage::Entity::assign_tenant(&mut model, tenant);
    model.stamp_created(now);
    model.stamp_updated(now);

    daily_usage::Entity::insert(model).on_conflict(
        OnConflict::columns([
            daily_usage::Column::TenantId,
            daily_usage::Column::OperationTypeId,
            daily_usage::Column::UsageDate,
        ])
        .do_nothing_on([daily_usage::Column::TenantId])
        .to_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn render(backend: DbBackend) -> String {
        let tenant = TenantId::parse("alice").unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let now = date.and_hms_opt(0, 0, 0).unwrap();
        counter_row_insert(&tenant, 1, date, now).build(backend).to_string()
    }

    #[test]
    fn counter_row_insert_should_render_valid_mysql_upsert() {
        let sql = render(DbBackend::MySql);

        assert!(!sql.contains("IGNORE"), "{}", sql);
        assert!(sql.contains("ON DUPLICATE KEY UPDATE"), "{}", sql);
    }

    #[test]
    fn counter_row_insert_should_do_nothing_on_sqlite_conflict() {
        let sql = render(DbBackend::Sqlite);

        assert!(sql.contains("ON CONFLICT"), "{}", sql);
        assert!(sql.contains("DO NOTHING"), "{}", sql);
    }
}
