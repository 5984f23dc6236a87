use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::User;

// 教师档案（phone / address / national_id 在库中加密）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorProfile {
    pub id: i64,
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
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct Tutor {
    pub user: User,
    pub profile: TutorProfile,
}
