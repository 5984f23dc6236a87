use serde::Serialize;
use ts_rs::TS;

use super::entities::{Class, ClassStudent};
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassResponse {
    pub class: Class,
}

pub type ClassListResponse = PaginatedResponse<Class>;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassStudentsResponse {
    pub items: Vec<ClassStudent>,
}

// 重复加入的学生计入 already_enrolled
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct EnrollmentResult {
    pub enrolled: u64,
    pub already_enrolled: u64,
}
