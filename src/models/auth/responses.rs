use serde::Serialize;
use ts_rs::TS;

use crate::models::students::entities::StudentProfile;
use crate::models::tutors::entities::TutorProfile;
use crate::models::users::entities::{AdminProfile, User};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

// 当前用户及其角色档案（仅填充与角色对应的一项）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct MeResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_profile: Option<AdminProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutor_profile: Option<TutorProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
}
