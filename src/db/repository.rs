//! 엔티티 단위 저장소
//!
//! `Repository`는 엔티티 하나에 대한 추가/수정/삭제(단건, 다건)를 제공하고,
//! `TenantRepository`는 여기에 테넌트 필터와 소유권 검사를 덧씌웁니다.
//! 두 타입 모두 트랜잭션 안에서만 만들어집니다 (`RepositorySet`).

use std::marker::PhantomData;

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QueryFilter,
};

use super::reader::Reader;
use crate::tenant::TenantId;
use crate::utils::error::AppError;
use crate::utils::time::now_utc;

/// 생성/수정 시각을 갖는 ActiveModel
///
/// 시각 컬럼이 없는 엔티티(연결 테이블 등)는 빈 구현을 사용합니다.
pub trait Timestamped {
    fn stamp_created(&mut self, _now: NaiveDateTime) {}
    fn stamp_updated(&mut self, _now: NaiveDateTime) {}
}

/// 테넌트가 소유하는 엔티티
pub trait TenantOwned: EntityTrait {
    fn tenant_column() -> Self::Column;

    fn assign_tenant(model: &mut Self::ActiveModel, tenant: &TenantId);

    /// 해당 테넌트의 행만 남기는 조건
    fn scope(tenant: &TenantId) -> Condition {
        Condition::all().add(Self::tenant_column().eq(tenant.as_str()))
    }
}

/// 엔티티 하나에 대한 기본 CRUD
pub struct Repository<'c, E, C> {
    conn: &'c C,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E, C> Repository<'c, E, C>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Timestamped + Send,
    C: ConnectionTrait,
{
    pub(crate) fn new(conn: &'c C) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub(crate) fn conn(&self) -> &'c C {
        self.conn
    }

    pub fn reader(&self) -> Reader<'c, E, C> {
        Reader::unscoped(self.conn)
    }

    pub async fn add(&self, mut model: E::ActiveModel) -> Result<E::Model, AppError> {
        let now = now_utc();
        model.stamp_created(now);
        model.stamp_updated(now);
        Ok(model.insert(self.conn).await?)
    }

    pub async fn add_range<I>(&self, models: I) -> Result<Vec<E::Model>, AppError>
    where
        I: IntoIterator<Item = E::ActiveModel>,
    {
        let mut inserted = Vec::new();
        for model in models {
            inserted.push(self.add(model).await?);
        }
        Ok(inserted)
    }

    pub async fn update(&self, mut model: E::ActiveModel) -> Result<E::Model, AppError> {
        model.stamp_updated(now_utc());
        Ok(model.update(self.conn).await?)
    }

    pub async fn update_range<I>(&self, models: I) -> Result<Vec<E::Model>, AppError>
    where
        I: IntoIterator<Item = E::ActiveModel>,
    {
        let mut updated = Vec::new();
        for model in models {
            updated.push(self.update(model).await?);
        }
        Ok(updated)
    }

    /// 삭제된 행 수 반환
    pub async fn delete(&self, model: E::ActiveModel) -> Result<u64, AppError> {
        let result = model.delete(self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_range<I>(&self, models: I) -> Result<u64, AppError>
    where
        I: IntoIterator<Item = E::ActiveModel>,
    {
        let mut deleted = 0;
        for model in models {
            deleted += self.delete(model).await?;
        }
        Ok(deleted)
    }

    pub async fn delete_where(&self, condition: Condition) -> Result<u64, AppError> {
        let result = E::delete_many().filter(condition).exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}

/// 테넌트 범위로 제한된 저장소
///
/// 조회는 항상 테넌트 조건이 붙고, 추가 시 테넌트 ID가 강제로 기록됩니다.
/// 수정/삭제는 먼저 테넌트 조건으로 기존 행을 찾은 뒤에만 수행되며,
/// 찾지 못하면 `NotFound` 에러입니다.
pub struct TenantRepository<'c, E, C> {
    inner: Repository<'c, E, C>,
    tenant: TenantId,
}

impl<'c, E, C> TenantRepository<'c, E, C>
where
    E: TenantOwned,
    E::Model: IntoActiveModel<E::ActiveModel> + Clone + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Timestamped + Send,
    C: ConnectionTrait,
{
    pub(crate) fn new(conn: &'c C, tenant: &TenantId) -> Self {
        Self {
            inner: Repository::new(conn),
            tenant: tenant.clone(),
        }
    }

    pub(crate) fn conn(&self) -> &'c C {
        self.inner.conn()
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn reader(&self) -> Reader<'c, E, C> {
        Reader::scoped(self.inner.conn(), E::scope(&self.tenant))
    }

    pub async fn add(&self, mut model: E::ActiveModel) -> Result<E::Model, AppError> {
        E::assign_tenant(&mut model, &self.tenant);
        self.inner.add(model).await
    }

    pub async fn add_range<I>(&self, models: I) -> Result<Vec<E::Model>, AppError>
    where
        I: IntoIterator<Item = E::ActiveModel>,
    {
        let mut inserted = Vec::new();
        for model in models {
            inserted.push(self.add(model).await?);
        }
        Ok(inserted)
    }

    /// 소유한 행을 찾아 `apply`로 변경한 뒤 저장합니다.
    ///
    /// `apply` 이후 테넌트 ID를 다시 기록하므로 소유자는 바뀌지 않습니다.
    pub async fn update_owned<K, F>(&self, id: K, apply: F) -> Result<E::Model, AppError>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Send,
        F: FnOnce(&mut E::ActiveModel) + Send,
    {
        let existing = self.find_owned(id).await?;
        let mut model = existing.into_active_model();
        apply(&mut model);
        E::assign_tenant(&mut model, &self.tenant);
        self.inner.update(model).await
    }

    pub async fn update_range_owned<K, F>(&self, ids: Vec<K>, apply: F) -> Result<Vec<E::Model>, AppError>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Send,
        F: Fn(&mut E::ActiveModel) + Send + Sync,
    {
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            updated.push(self.update_owned(id, &apply).await?);
        }
        Ok(updated)
    }

    /// 소유한 행을 삭제하고 삭제 전 값을 돌려줍니다.
    pub async fn delete_owned<K>(&self, id: K) -> Result<E::Model, AppError>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Send,
    {
        let existing = self.find_owned(id).await?;
        self.inner.delete(existing.clone().into_active_model()).await?;
        Ok(existing)
    }

    pub async fn delete_range_owned<K>(&self, ids: Vec<K>) -> Result<Vec<E::Model>, AppError>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Send,
    {
        let mut deleted = Vec::with_capacity(ids.len());
        for id in ids {
            deleted.push(self.delete_owned(id).await?);
        }
        Ok(deleted)
    }

    /// 테넌트 조건과 `condition`을 모두 만족하는 행 일괄 삭제
    pub async fn delete_where(&self, condition: Condition) -> Result<u64, AppError> {
        self.inner
            .delete_where(E::scope(&self.tenant).add(condition))
            .await
    }

    async fn find_owned<K>(&self, id: K) -> Result<E::Model, AppError>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Send,
    {
        self.reader().get(id).await?.ok_or_else(|| {
            AppError::not_found("존재하지 않거나 접근 권한이 없는 데이터입니다.")
        })
    }
}
