//! 用户实体

use sea_orm::entity::prelude::*;

use super::{parse_or, to_datetime};
use crate::models::users::entities::{User, UserRole, UserStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::student_profiles::Entity")]
    StudentProfile,
    #[sea_orm(has_one = "super::tutor_profiles::Entity")]
    TutorProfile,
    #[sea_orm(has_one = "super::admin_profiles::Entity")]
    AdminProfile,
    #[sea_orm(has_many = "super::class_students::Entity")]
    ClassStudents,
}

impl Related<super::student_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProfile.def()
    }
}

impl Related<super::tutor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TutorProfile.def()
    }
}

impl Related<super::admin_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminProfile.def()
    }
}

impl Related<super::class_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassStudents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_or(&self.role, UserRole::Student, "users.role"),
            status: parse_or(&self.status, UserStatus::Inactive, "users.status"),
            last_login: self.last_login.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
