use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;
use crate::string_enum;

string_enum! {
    // 公告受众
    #[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
    pub enum Audience {
        All => "all",
        Students => "students",
        Tutors => "tutors",
    }
}

impl Audience {
    /// 受众对应的角色；`All` 为学生和教师
    pub fn roles(&self) -> &'static [UserRole] {
        match self {
            Audience::All => &[UserRole::Student, UserRole::Tutor],
            Audience::Students => &[UserRole::Student],
            Audience::Tutors => &[UserRole::Tutor],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub audience: Audience,
    pub class_id: Option<i64>,
    pub created_by: Option<i64>,
    pub send_sms: bool,
    pub recipients: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
