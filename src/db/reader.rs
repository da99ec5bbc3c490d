use std::marker::PhantomData;

use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, PaginatorTrait, PrimaryKeyTrait, QueryFilter, Select,
};

use crate::utils::error::AppError;

/// 읽기 전용 조회기
///
/// 범위 조건(테넌트 필터 등)은 생성 시 고정되며, 호출자는 그 위에 조건/정렬만
/// 덧붙일 수 있습니다. 변경 메서드는 없습니다.
pub struct Reader<'c, E, C> {
    conn: &'c C,
    scope: Condition,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E, C> Reader<'c, E, C>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    pub(crate) fn unscoped(conn: &'c C) -> Self {
        Self::scoped(conn, Condition::all())
    }

    pub(crate) fn scoped(conn: &'c C, scope: Condition) -> Self {
        Self {
            conn,
            scope,
            _entity: PhantomData,
        }
    }

    fn base(&self) -> Select<E> {
        E::find().filter(self.scope.clone())
    }

    pub async fn all<F>(&self, query: F) -> Result<Vec<E::Model>, AppError>
    where
        F: FnOnce(Select<E>) -> Select<E> + Send,
    {
        Ok(query(self.base()).all(self.conn).await?)
    }

    pub async fn first<F>(&self, query: F) -> Result<Option<E::Model>, AppError>
    where
        F: FnOnce(Select<E>) -> Select<E> + Send,
    {
        Ok(query(self.base()).one(self.conn).await?)
    }

    pub async fn count<F>(&self, query: F) -> Result<u64, AppError>
    where
        F: FnOnce(Select<E>) -> Select<E> + Send,
    {
        Ok(query(self.base()).count(self.conn).await?)
    }

    pub async fn get<K>(&self, id: K) -> Result<Option<E::Model>, AppError>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Send,
    {
        Ok(E::find_by_id(id)
            .filter(self.scope.clone())
            .one(self.conn)
            .await?)
    }
}
