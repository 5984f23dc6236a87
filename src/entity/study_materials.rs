//! 学习资料实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::materials::entities::Material;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "study_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_id: i64,
    pub uploaded_by: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub original_name: String,
    #[sea_orm(unique)]
    pub stored_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_material(self) -> Material {
        Material {
            id: self.id,
            subject_id: self.subject_id,
            uploaded_by: self.uploaded_by,
            title: self.title,
            description: self.description,
            original_name: self.original_name,
            stored_name: self.stored_name,
            file_size: self.file_size,
            mime_type: self.mime_type,
            created_at: to_datetime(self.created_at),
        }
    }
}
