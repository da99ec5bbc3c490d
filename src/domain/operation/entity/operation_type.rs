use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::db::Timestamped;

/// 사용량 제한 대상 작업 카탈로그
/// 예: AI 이미지 생성, 일기 첨삭
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operation_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub operation_type_id: i64,
    /// 호출 코드 (예: "IMAGE_GENERATION")
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    /// 하루 허용 단위 수 (0 이하면 무제한)
    pub daily_limit: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn is_unlimited(&self) -> bool {
        self.daily_limit <= 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_usage::Entity")]
    DailyUsage,
}

impl Related<super::daily_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyUsage.def()
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
