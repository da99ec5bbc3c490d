use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::db::{TenantOwned, Timestamped};
use crate::tenant::TenantId;

/// 문장-장르 연결 테이블
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phrase_genres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub phrase_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub genre_id: i64,
    pub tenant_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::phrase::Entity",
        from = "Column::PhraseId",
        to = "super::phrase::Column::PhraseId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Phrase,
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::GenreId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Genre,
}

impl Related<super::phrase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phrase.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 연결 행은 생성/수정 시각을 갖지 않음
impl Timestamped for ActiveModel {}

impl TenantOwned for Entity {
    fn tenant_column() -> Column {
        Column::TenantId
    }

    fn assign_tenant(model: &mut ActiveModel, tenant: &TenantId) {
        model.tenant_id = Set(tenant.to_string());
    }
}
