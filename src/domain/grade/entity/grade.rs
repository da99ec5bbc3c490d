use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::db::Timestamped;

/// 성적 등급 기준 데이터
/// 정답률이 `min_rate` 이상이면 해당 등급이 됩니다.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub grade_id: i64,
    /// 등급 이름 (예: "S", "A", "B")
    #[sea_orm(unique)]
    pub name: String,
    /// 최소 정답률 (0.0 ~ 1.0)
    pub min_rate: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::test_result::entity::test_result::Entity")]
    TestResult,
}

impl Related<crate::domain::test_result::entity::test_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestResult.def()
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
