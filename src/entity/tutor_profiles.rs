//! 教师档案实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::errors::Result as AppResult;
use crate::models::tutors::entities::TutorProfile;
use crate::utils::FieldCipher;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tutor_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub base_salary: f64,
    pub per_session_rate: f64,
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
    pub fn into_profile(self, cipher: &FieldCipher) -> AppResult<TutorProfile> {
        Ok(TutorProfile {
            id: self.id,
            user_id: self.user_id,
            full_name: self.full_name,
            phone: cipher.decrypt_opt(self.phone)?,
            address: cipher.decrypt_opt(self.address)?,
            national_id: cipher.decrypt_opt(self.national_id)?,
            qualification: self.qualification,
            specialization: self.specialization,
            base_salary: self.base_salary,
            per_session_rate: self.per_session_rate,
            photo_path: self.photo_path,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        })
    }
}
