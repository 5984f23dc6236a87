//! 学生档案实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::errors::Result as AppResult;
use crate::models::students::entities::StudentProfile;
use crate::utils::FieldCipher;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub full_name: String,
    /// 密文
    pub phone: Option<String>,
    pub guardian_name: Option<String>,
    /// 密文
    pub guardian_phone: Option<String>,
    /// 密文
    pub address: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub school: Option<String>,
    pub photo_path: Option<String>,
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
    pub fn into_profile(self, cipher: &FieldCipher) -> AppResult<StudentProfile> {
        Ok(StudentProfile {
            id: self.id,
            user_id: self.user_id,
            full_name: self.full_name,
            phone: cipher.decrypt_opt(self.phone)?,
            guardian_name: self.guardian_name,
            guardian_phone: cipher.decrypt_opt(self.guardian_phone)?,
            address: cipher.decrypt_opt(self.address)?,
            date_of_birth: self.date_of_birth,
            school: self.school,
            photo_path: self.photo_path,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        })
    }
}
