use sea_orm::{DatabaseConnection, DatabaseTransaction};

use super::reader::Reader;
use super::repository::{Repository, TenantOwned, TenantRepository};
use crate::domain::grade::entity::grade;
use crate::domain::operation::entity::{daily_usage, operation_type};
use crate::domain::phrase::entity::{genre, phrase, phrase_genre, phrase_image};
use crate::domain::test_result::entity::{test_result, test_result_detail};
use crate::tenant::TenantId;

pub type TxRepository<'c, E> = Repository<'c, E, DatabaseTransaction>;
pub type TxTenantRepository<'c, E> = TenantRepository<'c, E, DatabaseTransaction>;
pub type TxReader<'c, E> = Reader<'c, E, DatabaseTransaction>;
pub type DbReader<'c, E> = Reader<'c, E, DatabaseConnection>;

/// 쓰기 트랜잭션 하나에 묶인 저장소 묶음
///
/// 모든 저장소가 같은 트랜잭션을 공유합니다. 테넌트 소유 엔티티의 저장소는
/// 테넌트 ID 없이는 얻을 수 없습니다.
pub struct RepositorySet<'c> {
    txn: &'c DatabaseTransaction,
}

impl<'c> RepositorySet<'c> {
    pub(crate) fn new(txn: &'c DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn phrases(&self, tenant: &TenantId) -> TxTenantRepository<'c, phrase::Entity> {
        TenantRepository::new(self.txn, tenant)
    }

    pub fn phrase_images(&self, tenant: &TenantId) -> TxTenantRepository<'c, phrase_image::Entity> {
        TenantRepository::new(self.txn, tenant)
    }

    pub fn genres(&self, tenant: &TenantId) -> TxTenantRepository<'c, genre::Entity> {
        TenantRepository::new(self.txn, tenant)
    }

    pub fn phrase_genres(&self, tenant: &TenantId) -> TxTenantRepository<'c, phrase_genre::Entity> {
        TenantRepository::new(self.txn, tenant)
    }

    pub fn daily_usages(&self, tenant: &TenantId) -> TxTenantRepository<'c, daily_usage::Entity> {
        TenantRepository::new(self.txn, tenant)
    }

    pub fn test_results(&self, tenant: &TenantId) -> TxTenantRepository<'c, test_result::Entity> {
        TenantRepository::new(self.txn, tenant)
    }

    pub fn test_result_details(
        &self,
        tenant: &TenantId,
    ) -> TxTenantRepository<'c, test_result_detail::Entity> {
        TenantRepository::new(self.txn, tenant)
    }

    pub fn operation_types(&self) -> TxRepository<'c, operation_type::Entity> {
        Repository::new(self.txn)
    }

    pub fn grades(&self) -> TxRepository<'c, grade::Entity> {
        Repository::new(self.txn)
    }

    /// 전체 테넌트의 사용량 기록 조회기
    ///
    /// 카탈로그 삭제 전 참조 여부 확인용입니다. 행 내용을 돌려주는 용도로 쓰지 않습니다.
    pub fn usage_history(&self) -> TxReader<'c, daily_usage::Entity> {
        Reader::unscoped(self.txn)
    }

    /// 전체 테넌트의 시험 결과 조회기 (등급 삭제 전 참조 확인용)
    pub fn result_history(&self) -> TxReader<'c, test_result::Entity> {
        Reader::unscoped(self.txn)
    }
}

/// 읽기 전용 조회기 묶음
///
/// 트랜잭션 없이 커넥션 풀에서 바로 조회합니다. 변경 메서드가 없으므로
/// 이 경로로는 상태를 바꿀 수 없습니다.
pub struct ReadRepositories<'c> {
    conn: &'c DatabaseConnection,
}

impl<'c> ReadRepositories<'c> {
    pub(crate) fn new(conn: &'c DatabaseConnection) -> Self {
        Self { conn }
    }

    fn owned<E>(&self, tenant: &TenantId) -> DbReader<'c, E>
    where
        E: TenantOwned,
        E::Model: Send + Sync,
    {
        Reader::scoped(self.conn, E::scope(tenant))
    }

    pub fn phrases(&self, tenant: &TenantId) -> DbReader<'c, phrase::Entity> {
        self.owned(tenant)
    }

    pub fn phrase_images(&self, tenant: &TenantId) -> DbReader<'c, phrase_image::Entity> {
        self.owned(tenant)
    }

    pub fn genres(&self, tenant: &TenantId) -> DbReader<'c, genre::Entity> {
        self.owned(tenant)
    }

    pub fn phrase_genres(&self, tenant: &TenantId) -> DbReader<'c, phrase_genre::Entity> {
        self.owned(tenant)
    }

    pub fn daily_usages(&self, tenant: &TenantId) -> DbReader<'c, daily_usage::Entity> {
        self.owned(tenant)
    }

    pub fn test_results(&self, tenant: &TenantId) -> DbReader<'c, test_result::Entity> {
        self.owned(tenant)
    }

    pub fn test_result_details(&self, tenant: &TenantId) -> DbReader<'c, test_result_detail::Entity> {
        self.owned(tenant)
    }

    pub fn operation_types(&self) -> DbReader<'c, operation_type::Entity> {
        Reader::unscoped(self.conn)
    }

    pub fn grades(&self) -> DbReader<'c, grade::Entity> {
        Reader::unscoped(self.conn)
    }
}
