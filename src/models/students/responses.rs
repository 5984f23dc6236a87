use serde::Serialize;
use ts_rs::TS;

use super::entities::Student;
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentResponse {
    pub student: Student,
}

pub type StudentListResponse = PaginatedResponse<Student>;

// 照片上传结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct PhotoResponse {
    pub photo_path: String,
    pub url: String,
}
