//! 管理员档案实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::errors::Result as AppResult;
use crate::models::users::entities::AdminProfile;
use crate::utils::FieldCipher;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_profile(self, cipher: &FieldCipher) -> AppResult<AdminProfile> {
        Ok(AdminProfile {
            id: self.id,
            user_id: self.user_id,
            full_name: self.full_name,
            phone: cipher.decrypt_opt(self.phone)?,
            position: self.position,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        })
    }
}
