use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::db::{TenantOwned, Timestamped};
use crate::tenant::TenantId;

/// 학습 문장 엔티티
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phrases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub phrase_id: i64,
    pub tenant_id: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    #[sea_orm(column_type = "Text")]
    pub meaning: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::phrase_image::Entity")]
    PhraseImage,
    #[sea_orm(has_many = "super::phrase_genre::Entity")]
    PhraseGenre,
}

impl Related<super::phrase_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhraseImage.def()
    }
}

impl Related<super::phrase_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhraseGenre.def()
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
