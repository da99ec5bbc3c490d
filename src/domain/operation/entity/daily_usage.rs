use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::db::{TenantOwned, Timestamped};
use crate::tenant::TenantId;

/// 일일 사용량 엔티티
/// (사용자, 작업 유형, 업무 기준 날짜)별 누적 사용 단위를 기록합니다.
/// 최초 사용 시 생성되며 일반 흐름에서는 삭제되지 않습니다.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_usages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub operation_type_id: i64,
    /// 업무 타임존 기준 날짜
    #[sea_orm(primary_key, auto_increment = false)]
    pub usage_date: Date,
    pub counter: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::operation_type::Entity",
        from = "Column::OperationTypeId",
        to = "super::operation_type::Column::OperationTypeId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    OperationType,
}

impl Related<super::operation_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperationType.def()
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
