use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{requests::EnrollStudentsRequest, responses::ClassStudentsResponse},
    users::entities::UserRole,
};
use crate::services::{field_error, not_found, storage_error};

pub async fn list_students(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(storage_error(e, "Failed to get class information")),
    }

    match storage.list_class_students(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassStudentsResponse { items },
            "Class students retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to list class students")),
    }
}

/// 批量加入，已在班级中的学生计入 already_enrolled
pub async fn enroll_students(
    service: &ClassService,
    class_id: i64,
    enroll: EnrollStudentsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if enroll.student_ids.is_empty() {
        return Ok(field_error(
            "student_ids",
            "The student_ids field must contain at least one id",
        ));
    }

    let storage = service.get_storage(request)?;
    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(storage_error(e, "Failed to get class information")),
    }

    // 只有学生账号可以加入班级
    let mut invalid = Vec::new();
    for &student_id in &enroll.student_ids {
        match storage.get_user_by_id(student_id).await {
            Ok(Some(user)) if user.role == UserRole::Student => {}
            Ok(_) => invalid.push(student_id.to_string()),
            Err(e) => return Ok(storage_error(e, "Failed to verify students")),
        }
    }
    if !invalid.is_empty() {
        return Ok(field_error(
            "student_ids",
            format!("The following ids are not students: {}", invalid.join(", ")),
        ));
    }

    match storage.enroll_students(class_id, &enroll.student_ids).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Students enrolled successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Enrollment failed")),
    }
}

pub async fn unenroll_student(
    service: &ClassService,
    class_id: i64,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.unenroll_student(class_id, student_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Student removed from class",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::StudentNotFound,
            "Student is not enrolled in this class",
        )),
        Err(e) => Ok(storage_error(e, "Failed to remove student from class")),
    }
}
