use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::db::{TenantOwned, Timestamped};
use crate::tenant::TenantId;

/// 시험 결과 헤더
/// 완료된 시험 1회당 1행이며, 상세 행이 최소 1개 이상 존재합니다.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "test_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub test_result_id: Uuid,
    pub tenant_id: String,
    /// 시험 완료 시각 (UTC)
    pub taken_at: DateTime,
    pub grade_id: i64,
    pub correct_count: i32,
    pub total_count: i32,
    pub is_completed: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::grade::entity::grade::Entity",
        from = "Column::GradeId",
        to = "crate::domain::grade::entity::grade::Column::GradeId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Grade,
    #[sea_orm(has_many = "super::test_result_detail::Entity")]
    TestResultDetail,
}

impl Related<crate::domain::grade::entity::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::test_result_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestResultDetail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Timestamped for ActiveModel {
    fn stamp_created(&mut self, now: DateTime) {
        self.created_at = Set(now);
    }

    fn stamp_updated(&mut self, now: DateTime) {
        self.updated_at = Set(now);
    }
}

impl TenantOwned for Entity {
    fn tenant_column() -> Column {
        Column::TenantId
    }

    fn assign_tenant(model: &mut ActiveModel, tenant: &TenantId) {
        model.tenant_id = Set(tenant.to_string());
    }
}
