//! 일일 사용량 제한
//!
//! 호출 흐름은 `check` → (외부 작업) → `record` 입니다. 두 호출은 서로 다른
//! 트랜잭션이므로 같은 키에 대한 동시 요청이 모두 `check`를 통과하면 한도를
//! 넘길 수 있습니다. 한도를 반드시 지켜야 하는 호출자는 `try_consume`을 사용합니다.

use std::future::Future;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, QueryFilter};
use tracing::{debug, info, warn};

use super::dto::{Gated, OperationCheck, Remaining};
use super::entity::operation_type;
use crate::db::Reader;
use crate::state::AppState;
use crate::tenant::TenantContext;
use crate::utils::error::AppError;
use crate::utils::time::business_today;

pub struct OperationLimiter;

impl OperationLimiter {
    /// 사용 가능 여부 확인 (읽기 전용)
    pub async fn check(
        state: &AppState,
        ctx: &TenantContext,
        code: &str,
        units: i32,
    ) -> Result<OperationCheck, AppError> {
        ensure_units(units)?;

        let tenant = ctx.tenant_id().clone();
        let code = code.to_string();
        let today = Self::today(state);

        state
            .uow
            .read("limiter.check", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let Some(op) = find_operation(&repos.operation_types(), &code).await? else {
                        return Ok(OperationCheck::unknown_operation(&code));
                    };
                    if op.is_unlimited() {
                        return Ok(OperationCheck::unlimited());
                    }

                    let used = repos
                        .daily_usages(&tenant)
                        .get((tenant.to_string(), op.operation_type_id, today))
                        .await?
                        .map(|usage| usage.counter)
                        .unwrap_or(0);

                    Ok(OperationCheck::evaluate(op.daily_limit, used, units))
                })
            })
            .await
    }

    /// 사용량 기록 (작업 성공 후에만 호출)
    pub async fn record(
        state: &AppState,
        ctx: &TenantContext,
        code: &str,
        units: i32,
    ) -> Result<(), AppError> {
        ensure_units(units)?;

        let tenant = ctx.tenant_id().clone();
        let code = code.to_string();
        let today = Self::today(state);

        state
            .uow
            .write("limiter.record", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let op = find_operation(&repos.operation_types().reader(), &code)
                        .await?
                        .ok_or_else(|| unknown_operation_error(&code))?;

                    let counter = repos
                        .daily_usages(&tenant)
                        .increment(op.operation_type_id, today, units)
                        .await?;

                    debug!(
                        tenant = %tenant,
                        operation = %code,
                        counter,
                        "usage recorded"
                    );
                    Ok(())
                })
            })
            .await
    }

    /// 한도 확인과 기록을 조건부 증가 한 번으로 처리합니다.
    ///
    /// 한도를 넘는 요청은 카운터를 바꾸지 않고 `allowed = false`를 돌려줍니다.
    pub async fn try_consume(
        state: &AppState,
        ctx: &TenantContext,
        code: &str,
        units: i32,
    ) -> Result<OperationCheck, AppError> {
        ensure_units(units)?;

        let tenant = ctx.tenant_id().clone();
        let code = code.to_string();
        let today = Self::today(state);

        state
            .uow
            .write("limiter.try_consume", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let Some(op) = find_operation(&repos.operation_types().reader(), &code).await?
                    else {
                        return Ok(OperationCheck::unknown_operation(&code));
                    };

                    let usages = repos.daily_usages(&tenant);

                    if op.is_unlimited() {
                        usages.increment(op.operation_type_id, today, units).await?;
                        return Ok(OperationCheck::unlimited());
                    }

                    let consumed = usages
                        .try_increment(op.operation_type_id, today, units, op.daily_limit)
                        .await?;
                    if !consumed {
                        info!(
                            tenant = %tenant,
                            operation = %code,
                            cap = op.daily_limit,
                            "daily limit reached"
                        );
                        return Ok(OperationCheck::exceeded(op.daily_limit));
                    }

                    let used = usages.counter(op.operation_type_id, today).await?;
                    let remaining = (op.daily_limit - used).max(0);
                    Ok(OperationCheck {
                        allowed: true,
                        remaining: Remaining::Units(remaining),
                        message: format!("오늘 {}회 더 사용할 수 있습니다.", remaining),
                    })
                })
            })
            .await
    }

    /// `check` 통과 시 `action`을 실행하고, 성공한 경우에만 `record` 합니다.
    ///
    /// `action`이 실패하면 사용량은 기록되지 않고 에러가 그대로 전달됩니다.
    pub async fn run_gated<T, A, Fut>(
        state: &AppState,
        ctx: &TenantContext,
        code: &str,
        units: i32,
        action: A,
    ) -> Result<Gated<T>, AppError>
    where
        A: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let check = Self::check(state, ctx, code, units).await?;
        if !check.allowed {
            return Ok(Gated::Denied(check));
        }

        let value = action().await?;

        if let Err(err) = Self::record(state, ctx, code, units).await {
            warn!(
                tenant = %ctx.tenant_id(),
                operation = %code,
                error = %err,
                "gated action succeeded but usage was not recorded"
            );
            return Err(err);
        }

        Ok(Gated::Completed(value))
    }

    /// 오늘 누적 사용량 (기록이 없으면 0)
    pub async fn usage_today(
        state: &AppState,
        ctx: &TenantContext,
        code: &str,
    ) -> Result<i32, AppError> {
        let tenant = ctx.tenant_id().clone();
        let code = code.to_string();
        let today = Self::today(state);

        state
            .uow
            .read("limiter.usage_today", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let op = find_operation(&repos.operation_types(), &code)
                        .await?
                        .ok_or_else(|| unknown_operation_error(&code))?;

                    Ok(repos
                        .daily_usages(&tenant)
                        .get((tenant.to_string(), op.operation_type_id, today))
                        .await?
                        .map(|usage| usage.counter)
                        .unwrap_or(0))
                })
            })
            .await
    }

    fn today(state: &AppState) -> NaiveDate {
        business_today(state.config.business_offset())
    }
}

fn ensure_units(units: i32) -> Result<(), AppError> {
    if units < 1 {
        return Err(AppError::bad_request("사용 단위는 1 이상이어야 합니다."));
    }
    Ok(())
}

fn unknown_operation_error(code: &str) -> AppError {
    AppError::not_found(format!("등록되지 않은 작업 유형입니다: {}", code))
}

async fn find_operation<C>(
    reader: &Reader<'_, operation_type::Entity, C>,
    code: &str,
) -> Result<Option<operation_type::Model>, AppError>
where
    C: ConnectionTrait,
{
    let code = code.to_string();
    reader
        .first(move |q| q.filter(operation_type::Column::Code.eq(code)))
        .await
}
