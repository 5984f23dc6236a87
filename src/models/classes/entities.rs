use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub monthly_fee: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班级成员（学生）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassStudent {
    pub class_id: i64,
    pub student_id: i64,
    pub username: String,
    pub full_name: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
