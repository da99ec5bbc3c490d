use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::db::{TenantOwned, Timestamped};
use crate::tenant::TenantId;

/// 문장 이미지 엔티티
/// 문장당 최대 1개이며, 문장 삭제 시 함께 삭제됩니다.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phrase_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub phrase_image_id: i64,
    pub tenant_id: String,
    pub phrase_id: i64,
    /// 이미지 위치 (스토리지 URL)
    pub url: String,
    /// 생성에 사용한 프롬프트 (직접 업로드한 경우 None)
    #[sea_orm(column_type = "Text", nullable)]
    pub prompt: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
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
}

impl Related<super::phrase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phrase.def()
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
